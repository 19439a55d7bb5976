//! Discovery session service
//!
//! Session flows that cross tables: template attachment, section-notes
//! persistence through the codec, and the idempotent solution links.

use std::collections::HashMap;

use sf_core::forms::SessionInput;
use sf_core::types::{DiscoverySession, DiscoveryTemplate, Solution};
use sf_core::{decode_sections, encode_sections};

use crate::entities::new_session;
use crate::error::{DbError, DbResult};
use crate::repos::{LinkOutcome, LinkRepo, SessionRepo, SolutionRepo, TemplateRepo, UnlinkOutcome};

/// Session flows for the discovery area
#[derive(Clone)]
pub struct DiscoveryService {
    sessions: SessionRepo,
    templates: TemplateRepo,
    links: LinkRepo,
    solutions: SolutionRepo,
}

impl DiscoveryService {
    pub fn new(
        sessions: SessionRepo,
        templates: TemplateRepo,
        links: LinkRepo,
        solutions: SolutionRepo,
    ) -> Self {
        Self {
            sessions,
            templates,
            links,
            solutions,
        }
    }

    /// Create a session from validated input
    pub async fn create_session(&self, input: SessionInput) -> DbResult<DiscoverySession> {
        let session = new_session(input);
        self.sessions.insert(&session).await?;
        tracing::info!(session_id = %session.id, "discovery session created");
        Ok(session)
    }

    /// Save the whole notes blob; empty text clears it
    pub async fn save_notes(&self, session_id: &str, notes: &str) -> DbResult<DiscoverySession> {
        let stored = if notes.is_empty() { None } else { Some(notes) };
        self.sessions.save_notes(session_id, stored).await
    }

    /// Attach a template to a session (or detach with `None`).
    ///
    /// The template is looked up first so a bad id surfaces as a
    /// not-found rather than a bare constraint failure.
    pub async fn attach_template(
        &self,
        session_id: &str,
        template_id: Option<&str>,
    ) -> DbResult<DiscoverySession> {
        if let Some(template_id) = template_id {
            if self.templates.get(template_id).await?.is_none() {
                return Err(DbError::NotFound {
                    entity: "template",
                    id: template_id.to_string(),
                });
            }
        }
        self.sessions.set_template(session_id, template_id).await
    }

    /// Decode the session's notes against its template's sections.
    ///
    /// Returned pairs follow the template's section order. Sessions
    /// without a template have no section structure to decode.
    pub async fn section_notes(&self, session_id: &str) -> DbResult<Vec<(String, String)>> {
        let (session, template) = self.session_with_template(session_id).await?;
        let notes = session.notes.as_deref().unwrap_or("");
        let mut decoded = decode_sections(&template.sections, notes);

        Ok(template
            .sections
            .iter()
            .map(|section| {
                let content = decoded.remove(section).unwrap_or_default();
                (section.clone(), content)
            })
            .collect())
    }

    /// Encode per-section content through the template and store it as
    /// the session's notes blob.
    pub async fn save_section_notes(
        &self,
        session_id: &str,
        content: &HashMap<String, String>,
    ) -> DbResult<DiscoverySession> {
        let (_, template) = self.session_with_template(session_id).await?;
        let encoded = encode_sections(&template.sections, content);
        self.sessions.save_notes(session_id, Some(&encoded)).await
    }

    /// Link a solution to a session.
    ///
    /// Both records must exist; an already-linked pair reports
    /// [`LinkOutcome::AlreadyLinked`] without touching the store.
    pub async fn link_solution(
        &self,
        session_id: &str,
        solution_id: &str,
    ) -> DbResult<LinkOutcome> {
        self.require_session(session_id).await?;
        if self.solutions.get(solution_id).await?.is_none() {
            return Err(DbError::NotFound {
                entity: "solution",
                id: solution_id.to_string(),
            });
        }
        self.links.link(session_id, solution_id).await
    }

    /// Unlink a solution; an absent pair is a silent no-op
    pub async fn unlink_solution(
        &self,
        session_id: &str,
        solution_id: &str,
    ) -> DbResult<UnlinkOutcome> {
        self.require_session(session_id).await?;
        self.links.unlink(session_id, solution_id).await
    }

    /// Solutions linked to the session, ordered by name
    pub async fn linked_solutions(&self, session_id: &str) -> DbResult<Vec<Solution>> {
        self.require_session(session_id).await?;
        self.links.solutions_for_session(session_id).await
    }

    async fn require_session(&self, session_id: &str) -> DbResult<DiscoverySession> {
        self.sessions
            .get(session_id)
            .await?
            .ok_or_else(|| DbError::NotFound {
                entity: "discovery session",
                id: session_id.to_string(),
            })
    }

    async fn session_with_template(
        &self,
        session_id: &str,
    ) -> DbResult<(DiscoverySession, DiscoveryTemplate)> {
        let session = self.require_session(session_id).await?;
        let Some(template_id) = session.template_id.clone() else {
            return Err(DbError::Validation(
                "Session has no template attached".to_string(),
            ));
        };
        let template =
            self.templates
                .get(&template_id)
                .await?
                .ok_or_else(|| DbError::NotFound {
                    entity: "template",
                    id: template_id,
                })?;
        Ok((session, template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{new_solution, new_template};
    use crate::repos::{test_db, Database};
    use chrono::NaiveDate;
    use sf_core::forms::{SolutionInput, TemplateInput};

    fn service(db: &Database) -> DiscoveryService {
        DiscoveryService::new(
            db.sessions.clone(),
            db.templates.clone(),
            db.links.clone(),
            db.solutions.clone(),
        )
    }

    fn session_input() -> SessionInput {
        SessionInput {
            client_name: "Acme".to_string(),
            opportunity_name: Some("Website Redesign".to_string()),
            session_date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
        }
    }

    async fn template_with_sections(db: &Database) -> String {
        let template = new_template(TemplateInput {
            name: "Standard".to_string(),
            sections: vec!["Goals".to_string(), "Pain Points".to_string()],
        });
        db.templates.insert(&template).await.unwrap();
        template.id
    }

    #[tokio::test]
    async fn test_section_notes_roundtrip() {
        let db = test_db().await;
        let svc = service(&db);
        let session = svc.create_session(session_input()).await.unwrap();
        let template_id = template_with_sections(&db).await;
        svc.attach_template(&session.id, Some(&template_id)).await.unwrap();

        let mut content = HashMap::new();
        content.insert("Goals".to_string(), "Grow revenue".to_string());
        content.insert("Pain Points".to_string(), "Slow onboarding".to_string());
        let saved = svc.save_section_notes(&session.id, &content).await.unwrap();
        assert_eq!(
            saved.notes.as_deref(),
            Some("## Goals\nGrow revenue\n\n## Pain Points\nSlow onboarding")
        );

        let decoded = svc.section_notes(&session.id).await.unwrap();
        assert_eq!(
            decoded,
            vec![
                ("Goals".to_string(), "Grow revenue".to_string()),
                ("Pain Points".to_string(), "Slow onboarding".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_section_notes_without_template_is_rejected() {
        let db = test_db().await;
        let svc = service(&db);
        let session = svc.create_session(session_input()).await.unwrap();

        let err = svc.section_notes(&session.id).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }

    #[tokio::test]
    async fn test_section_notes_on_empty_notes_default_to_empty() {
        let db = test_db().await;
        let svc = service(&db);
        let session = svc.create_session(session_input()).await.unwrap();
        let template_id = template_with_sections(&db).await;
        svc.attach_template(&session.id, Some(&template_id)).await.unwrap();

        let decoded = svc.section_notes(&session.id).await.unwrap();
        assert_eq!(
            decoded,
            vec![
                ("Goals".to_string(), String::new()),
                ("Pain Points".to_string(), String::new()),
            ]
        );
    }

    #[tokio::test]
    async fn test_attach_unknown_template() {
        let db = test_db().await;
        let svc = service(&db);
        let session = svc.create_session(session_input()).await.unwrap();

        let err = svc
            .attach_template(&session.id, Some("tpl_missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "template", .. }));
    }

    #[tokio::test]
    async fn test_link_solution_validates_both_sides() {
        let db = test_db().await;
        let svc = service(&db);
        let session = svc.create_session(session_input()).await.unwrap();

        let err = svc.link_solution(&session.id, "sol_missing").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { entity: "solution", .. }));

        let solution = new_solution(SolutionInput {
            name: "Cloud Audit".to_string(),
            description: None,
            pain_points: None,
        });
        db.solutions.insert(&solution).await.unwrap();

        assert_eq!(
            svc.link_solution(&session.id, &solution.id).await.unwrap(),
            LinkOutcome::Linked
        );
        assert_eq!(
            svc.link_solution(&session.id, &solution.id).await.unwrap(),
            LinkOutcome::AlreadyLinked
        );
        assert_eq!(svc.linked_solutions(&session.id).await.unwrap().len(), 1);

        assert_eq!(
            svc.unlink_solution(&session.id, &solution.id).await.unwrap(),
            UnlinkOutcome::Unlinked
        );
        assert_eq!(
            svc.unlink_solution(&session.id, &solution.id).await.unwrap(),
            UnlinkOutcome::NotLinked
        );
    }
}
