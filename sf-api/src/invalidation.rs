//! Cache invalidation table
//!
//! Every mutation kind maps to the cached collections it must flush.
//! The table is data, not behavior scattered through handlers, so the
//! refresh rules can be reviewed and tested in one place.

use serde::Serialize;

/// Cached list collections, keyed alongside their query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Solutions,
    Opportunities,
    OpportunitySummary,
    Sessions,
    SessionSolutions,
    Templates,
    Dashboard,
}

/// Everything the API can change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    SolutionCreate,
    SolutionUpdate,
    SolutionStatusChange,
    SolutionDelete,
    OpportunityCreate,
    OpportunityUpdate,
    OpportunityDelete,
    OpportunitySessionLink,
    SessionCreate,
    SessionUpdate,
    SessionDelete,
    SessionNotesSave,
    SessionTemplateChange,
    SolutionLink,
    SolutionUnlink,
    TemplateCreate,
    TemplateUpdate,
    TemplateDelete,
}

impl MutationKind {
    /// Collections a successful mutation of this kind must refresh
    pub fn collections_to_refresh(&self) -> &'static [Collection] {
        use Collection::*;
        match self {
            MutationKind::SolutionCreate
            | MutationKind::SolutionUpdate
            | MutationKind::SolutionStatusChange => &[Solutions, SessionSolutions, Dashboard],
            MutationKind::SolutionDelete => &[Solutions, SessionSolutions, Dashboard],

            MutationKind::OpportunityCreate
            | MutationKind::OpportunityUpdate
            | MutationKind::OpportunityDelete => &[Opportunities, OpportunitySummary, Dashboard],
            MutationKind::OpportunitySessionLink => &[Opportunities],

            MutationKind::SessionCreate | MutationKind::SessionDelete => &[Sessions, Dashboard],
            MutationKind::SessionUpdate
            | MutationKind::SessionNotesSave
            | MutationKind::SessionTemplateChange => &[Sessions],

            MutationKind::SolutionLink | MutationKind::SolutionUnlink => &[SessionSolutions],

            MutationKind::TemplateCreate
            | MutationKind::TemplateUpdate
            | MutationKind::TemplateDelete => &[Templates],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MUTATIONS: [MutationKind; 18] = [
        MutationKind::SolutionCreate,
        MutationKind::SolutionUpdate,
        MutationKind::SolutionStatusChange,
        MutationKind::SolutionDelete,
        MutationKind::OpportunityCreate,
        MutationKind::OpportunityUpdate,
        MutationKind::OpportunityDelete,
        MutationKind::OpportunitySessionLink,
        MutationKind::SessionCreate,
        MutationKind::SessionUpdate,
        MutationKind::SessionDelete,
        MutationKind::SessionNotesSave,
        MutationKind::SessionTemplateChange,
        MutationKind::SolutionLink,
        MutationKind::SolutionUnlink,
        MutationKind::TemplateCreate,
        MutationKind::TemplateUpdate,
        MutationKind::TemplateDelete,
    ];

    #[test]
    fn test_every_mutation_refreshes_something() {
        for kind in ALL_MUTATIONS {
            assert!(
                !kind.collections_to_refresh().is_empty(),
                "{kind:?} refreshes nothing"
            );
        }
    }

    #[test]
    fn test_mutations_refresh_their_own_collection() {
        assert!(MutationKind::SolutionCreate
            .collections_to_refresh()
            .contains(&Collection::Solutions));
        assert!(MutationKind::OpportunityCreate
            .collections_to_refresh()
            .contains(&Collection::Opportunities));
        assert!(MutationKind::SessionCreate
            .collections_to_refresh()
            .contains(&Collection::Sessions));
        assert!(MutationKind::TemplateDelete
            .collections_to_refresh()
            .contains(&Collection::Templates));
        assert!(MutationKind::SolutionLink
            .collections_to_refresh()
            .contains(&Collection::SessionSolutions));
    }

    #[test]
    fn test_opportunity_mutations_refresh_summary() {
        // The summary widgets tally the whole collection, so any
        // opportunity write must flush them too.
        for kind in [
            MutationKind::OpportunityCreate,
            MutationKind::OpportunityUpdate,
            MutationKind::OpportunityDelete,
        ] {
            assert!(kind
                .collections_to_refresh()
                .contains(&Collection::OpportunitySummary));
        }
    }

    #[test]
    fn test_counts_feeding_dashboard_refresh_it() {
        for kind in [
            MutationKind::SolutionCreate,
            MutationKind::SolutionStatusChange,
            MutationKind::OpportunityUpdate,
            MutationKind::SessionCreate,
        ] {
            assert!(kind.collections_to_refresh().contains(&Collection::Dashboard));
        }
    }
}
