//! Service implementations
//!
//! Services own the flows that need more than one statement or a
//! domain check before the write: stage/type enforcement on the
//! pipeline, the guarded template delete, and the discovery-session
//! flows (notes, section notes, solution links).

mod discovery_service;
mod opportunity_service;
mod template_service;

pub use discovery_service::DiscoveryService;
pub use opportunity_service::OpportunityService;
pub use template_service::TemplateService;
