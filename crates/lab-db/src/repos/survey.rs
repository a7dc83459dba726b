//! Survey tree repository: Survey -> SurveyForm -> Question -> Choice.
//!
//! Children at every level are ordered by `position`, assigned on insert as
//! one past the current maximum among siblings.

use std::collections::HashMap;

use chrono::Utc;

use lab_core::audit_detail::StatusChangedDetail;
use lab_core::entities::{Choice, Question, Survey, SurveyForm};
use lab_core::enums::{AuditAction, EntityType, SurveyStatus};
use lab_core::errors::CoreError;
use lab_core::identity::Actor;
use lab_core::ids::{PREFIX_CHOICE, PREFIX_FORM, PREFIX_QUESTION, PREFIX_SURVEY};

use crate::error::DatabaseError;
use crate::helpers::{
    ensure_exists, get_opt_string, get_u32, parse_datetime, parse_enum, query_count,
};
use crate::repos::research::require_research;
use crate::service::LabService;

const SURVEY_COLUMNS: &str = "id, research_id, creator_id, title, description, label, status, created_at";

fn row_to_survey(row: &libsql::Row) -> Result<Survey, DatabaseError> {
    Ok(Survey {
        id: row.get::<String>(0)?,
        research_id: row.get::<String>(1)?,
        creator_id: row.get::<String>(2)?,
        title: row.get::<String>(3)?,
        description: get_opt_string(row, 4)?,
        label: row.get::<String>(5)?,
        status: parse_enum(&row.get::<String>(6)?)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        forms: Vec::new(),
    })
}

fn row_to_form(row: &libsql::Row) -> Result<SurveyForm, DatabaseError> {
    Ok(SurveyForm {
        id: row.get::<String>(0)?,
        survey_id: row.get::<String>(1)?,
        title: row.get::<String>(2)?,
        position: get_u32(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        questions: Vec::new(),
    })
}

fn row_to_question(row: &libsql::Row) -> Result<Question, DatabaseError> {
    Ok(Question {
        id: row.get::<String>(0)?,
        form_id: row.get::<String>(1)?,
        prompt: row.get::<String>(2)?,
        position: get_u32(row, 3)?,
        choices: Vec::new(),
    })
}

fn row_to_choice(row: &libsql::Row) -> Result<Choice, DatabaseError> {
    Ok(Choice {
        id: row.get::<String>(0)?,
        question_id: row.get::<String>(1)?,
        label: row.get::<String>(2)?,
        position: get_u32(row, 3)?,
    })
}

/// Group rows by parent ID, keeping query order within each group.
fn group_by_parent<T>(items: Vec<T>, parent: impl Fn(&T) -> &str) -> HashMap<String, Vec<T>> {
    let mut grouped: HashMap<String, Vec<T>> = HashMap::new();
    for item in items {
        grouped.entry(parent(&item).to_string()).or_default().push(item);
    }
    grouped
}

fn push_or_skip<T>(
    items: &mut Vec<T>,
    parsed: Result<T, DatabaseError>,
    level: &'static str,
    research_id: &str,
) {
    match parsed {
        Ok(item) => items.push(item),
        Err(e) => {
            tracing::warn!(research_id, level, error = %e, "skipping malformed survey node");
        }
    }
}

/// Load every survey attached to a research item with its full tree.
///
/// Four queries, one per level, regardless of tree size. Surveys come back
/// oldest first; children in `position` order. A node whose row cannot be
/// parsed is skipped with a warning and its subtree is dropped with it, so
/// it counts as zero responses.
pub(crate) async fn read_survey_tree(
    conn: &libsql::Connection,
    research_id: &str,
) -> Result<Vec<Survey>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {SURVEY_COLUMNS} FROM surveys WHERE research_id = ?1
                 ORDER BY created_at, id"
            ),
            [research_id],
        )
        .await?;
    let mut surveys = Vec::new();
    while let Some(row) = rows.next().await? {
        push_or_skip(&mut surveys, row_to_survey(&row), "survey", research_id);
    }
    if surveys.is_empty() {
        return Ok(surveys);
    }

    let mut rows = conn
        .query(
            "SELECT f.id, f.survey_id, f.title, f.position, f.created_at
             FROM survey_forms f JOIN surveys s ON s.id = f.survey_id
             WHERE s.research_id = ?1
             ORDER BY f.survey_id, f.position",
            [research_id],
        )
        .await?;
    let mut forms = Vec::new();
    while let Some(row) = rows.next().await? {
        push_or_skip(&mut forms, row_to_form(&row), "survey_form", research_id);
    }

    let mut rows = conn
        .query(
            "SELECT q.id, q.form_id, q.prompt, q.position
             FROM questions q
             JOIN survey_forms f ON f.id = q.form_id
             JOIN surveys s ON s.id = f.survey_id
             WHERE s.research_id = ?1
             ORDER BY q.form_id, q.position",
            [research_id],
        )
        .await?;
    let mut questions = Vec::new();
    while let Some(row) = rows.next().await? {
        push_or_skip(&mut questions, row_to_question(&row), "question", research_id);
    }

    let mut rows = conn
        .query(
            "SELECT c.id, c.question_id, c.label, c.position
             FROM choices c
             JOIN questions q ON q.id = c.question_id
             JOIN survey_forms f ON f.id = q.form_id
             JOIN surveys s ON s.id = f.survey_id
             WHERE s.research_id = ?1
             ORDER BY c.question_id, c.position",
            [research_id],
        )
        .await?;
    let mut choices = Vec::new();
    while let Some(row) = rows.next().await? {
        push_or_skip(&mut choices, row_to_choice(&row), "choice", research_id);
    }

    let mut choices_by_question = group_by_parent(choices, |c| &c.question_id);
    for question in &mut questions {
        question.choices = choices_by_question.remove(&question.id).unwrap_or_default();
    }
    let mut questions_by_form = group_by_parent(questions, |q| &q.form_id);
    for form in &mut forms {
        form.questions = questions_by_form.remove(&form.id).unwrap_or_default();
    }
    let mut forms_by_survey = group_by_parent(forms, |f| &f.survey_id);
    for survey in &mut surveys {
        survey.forms = forms_by_survey.remove(&survey.id).unwrap_or_default();
    }

    Ok(surveys)
}

async fn read_survey(conn: &libsql::Connection, survey_id: &str) -> Result<Survey, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {SURVEY_COLUMNS} FROM surveys WHERE id = ?1"),
            [survey_id],
        )
        .await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::from(CoreError::not_found(EntityType::Survey, survey_id)))?;
    row_to_survey(&row)
}

pub(crate) async fn read_active_survey_count(conn: &libsql::Connection) -> Result<u64, DatabaseError> {
    query_count(conn, "SELECT COUNT(*) FROM surveys WHERE status = 'active'", ()).await
}

/// Creator or admin may change a survey, and only while it is active.
fn ensure_survey_writable(actor: &Actor, survey: &Survey) -> Result<(), CoreError> {
    if !actor.is_admin() && survey.creator_id != actor.user_id {
        return Err(CoreError::Forbidden {
            actor: actor.user_id.clone(),
            reason: format!("not the creator of survey {}", survey.id),
        });
    }
    if survey.status != SurveyStatus::Active {
        return Err(CoreError::Validation(format!("survey {} is closed", survey.id)));
    }
    Ok(())
}

/// Resolve the survey that owns a form, question, or the survey itself.
async fn owning_survey(
    conn: &libsql::Connection,
    entity: EntityType,
    id: &str,
) -> Result<Survey, DatabaseError> {
    let sql = match entity {
        EntityType::SurveyForm => "SELECT survey_id FROM survey_forms WHERE id = ?1",
        EntityType::Question => {
            "SELECT f.survey_id FROM questions q JOIN survey_forms f ON f.id = q.form_id
             WHERE q.id = ?1"
        }
        _ => return read_survey(conn, id).await,
    };
    let mut rows = conn.query(sql, [id]).await?;
    let row = rows
        .next()
        .await?
        .ok_or_else(|| DatabaseError::from(CoreError::not_found(entity, id)))?;
    let survey_id = row.get::<String>(0)?;
    read_survey(conn, &survey_id).await
}

async fn next_position(
    conn: &libsql::Connection,
    table: &str,
    parent_column: &str,
    parent_id: &str,
) -> Result<u32, DatabaseError> {
    let next = query_count(
        conn,
        &format!("SELECT COALESCE(MAX(position) + 1, 0) FROM {table} WHERE {parent_column} = ?1"),
        [parent_id],
    )
    .await?;
    u32::try_from(next).map_err(|_| DatabaseError::InvalidState(format!("{table} position overflow")))
}

fn validate_text(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

impl LabService {
    /// Attach a new, empty survey to a research item.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` for an unknown research item, or
    /// `CoreError::Validation` if the creator already has a survey with this
    /// label.
    pub async fn create_survey(
        &self,
        actor: &Actor,
        research_id: &str,
        title: &str,
        description: Option<&str>,
        label: &str,
    ) -> Result<Survey, DatabaseError> {
        validate_text("title", title)?;
        validate_text("label", label)?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SURVEY).await?;

        let tx = self.db().begin().await?;
        ensure_exists(&tx, EntityType::Research, research_id).await?;
        let taken = query_count(
            &tx,
            "SELECT COUNT(*) FROM surveys WHERE creator_id = ?1 AND label = ?2",
            [actor.user_id.as_str(), label],
        )
        .await?;
        if taken > 0 {
            return Err(CoreError::Validation("label already exists".into()).into());
        }

        tx.execute(
            "INSERT INTO surveys (id, research_id, creator_id, title, description, label, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'active', ?7)",
            libsql::params![
                id.as_str(),
                research_id,
                actor.user_id.as_str(),
                title,
                description,
                label,
                now.to_rfc3339()
            ],
        )
        .await?;
        self.audit(&tx, &actor.user_id, EntityType::Survey, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        Ok(Survey {
            id,
            research_id: research_id.to_string(),
            creator_id: actor.user_id.clone(),
            title: title.to_string(),
            description: description.map(String::from),
            label: label.to_string(),
            status: SurveyStatus::Active,
            created_at: now,
            forms: Vec::new(),
        })
    }

    /// Append a form to an active survey.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound`, `CoreError::Forbidden` for someone other
    /// than the creator or an admin, or `CoreError::Validation` if the survey
    /// is closed.
    pub async fn add_form(
        &self,
        actor: &Actor,
        survey_id: &str,
        title: &str,
    ) -> Result<SurveyForm, DatabaseError> {
        validate_text("title", title)?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_FORM).await?;

        let tx = self.db().begin().await?;
        let survey = owning_survey(&tx, EntityType::Survey, survey_id).await?;
        ensure_survey_writable(actor, &survey)?;
        let position = next_position(&tx, "survey_forms", "survey_id", survey_id).await?;
        tx.execute(
            "INSERT INTO survey_forms (id, survey_id, title, position, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            libsql::params![id.as_str(), survey_id, title, i64::from(position), now.to_rfc3339()],
        )
        .await?;
        self.audit(&tx, &actor.user_id, EntityType::SurveyForm, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        Ok(SurveyForm {
            id,
            survey_id: survey_id.to_string(),
            title: title.to_string(),
            position,
            created_at: now,
            questions: Vec::new(),
        })
    }

    /// Append a question to a form.
    ///
    /// # Errors
    ///
    /// Same as [`Self::add_form`], resolved through the owning survey.
    pub async fn add_question(
        &self,
        actor: &Actor,
        form_id: &str,
        prompt: &str,
    ) -> Result<Question, DatabaseError> {
        validate_text("prompt", prompt)?;
        let id = self.db().generate_id(PREFIX_QUESTION).await?;

        let tx = self.db().begin().await?;
        let survey = owning_survey(&tx, EntityType::SurveyForm, form_id).await?;
        ensure_survey_writable(actor, &survey)?;
        let position = next_position(&tx, "questions", "form_id", form_id).await?;
        tx.execute(
            "INSERT INTO questions (id, form_id, prompt, position) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![id.as_str(), form_id, prompt, i64::from(position)],
        )
        .await?;
        self.audit(&tx, &actor.user_id, EntityType::Question, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        Ok(Question {
            id,
            form_id: form_id.to_string(),
            prompt: prompt.to_string(),
            position,
            choices: Vec::new(),
        })
    }

    /// Append a choice to a question.
    ///
    /// # Errors
    ///
    /// Same as [`Self::add_form`], resolved through the owning survey.
    pub async fn add_choice(
        &self,
        actor: &Actor,
        question_id: &str,
        label: &str,
    ) -> Result<Choice, DatabaseError> {
        validate_text("label", label)?;
        let id = self.db().generate_id(PREFIX_CHOICE).await?;

        let tx = self.db().begin().await?;
        let survey = owning_survey(&tx, EntityType::Question, question_id).await?;
        ensure_survey_writable(actor, &survey)?;
        let position = next_position(&tx, "choices", "question_id", question_id).await?;
        tx.execute(
            "INSERT INTO choices (id, question_id, label, position) VALUES (?1, ?2, ?3, ?4)",
            libsql::params![id.as_str(), question_id, label, i64::from(position)],
        )
        .await?;
        self.audit(&tx, &actor.user_id, EntityType::Choice, &id, AuditAction::Created, None)
            .await?;
        tx.commit().await?;

        Ok(Choice {
            id,
            question_id: question_id.to_string(),
            label: label.to_string(),
            position,
        })
    }

    /// Close an active survey. Closed is terminal.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound`, `CoreError::Forbidden`, or
    /// `CoreError::InvalidTransition` if it is already closed.
    pub async fn close_survey(&self, actor: &Actor, survey_id: &str) -> Result<Survey, DatabaseError> {
        let tx = self.db().begin().await?;
        let mut survey = read_survey(&tx, survey_id).await?;
        if !actor.is_admin() && survey.creator_id != actor.user_id {
            return Err(CoreError::Forbidden {
                actor: actor.user_id.clone(),
                reason: format!("not the creator of survey {survey_id}"),
            }
            .into());
        }
        if !survey.status.can_transition_to(SurveyStatus::Closed) {
            return Err(CoreError::invalid_transition(
                EntityType::Survey,
                survey_id,
                survey.status,
                SurveyStatus::Closed,
            )
            .into());
        }

        tx.execute(
            "UPDATE surveys SET status = 'closed' WHERE id = ?1 AND status = 'active'",
            [survey_id],
        )
        .await?;
        let detail = serde_json::to_value(StatusChangedDetail {
            from: survey.status.as_str().to_string(),
            to: SurveyStatus::Closed.as_str().to_string(),
            reason: None,
        })
        .map_err(|e| DatabaseError::Other(e.into()))?;
        self.audit(
            &tx,
            &actor.user_id,
            EntityType::Survey,
            survey_id,
            AuditAction::StatusChanged,
            Some(detail),
        )
        .await?;
        tx.commit().await?;

        survey.status = SurveyStatus::Closed;
        Ok(survey)
    }

    /// Every survey on a research item, fully nested and ordered.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotFound` (wrapped) for an unknown research item.
    pub async fn load_survey_tree(&self, research_id: &str) -> Result<Vec<Survey>, DatabaseError> {
        let tx = self.db().snapshot().await?;
        require_research(&tx, research_id).await?;
        let surveys = read_survey_tree(&tx, research_id).await?;
        tx.commit().await?;
        Ok(surveys)
    }

    /// Number of surveys still accepting responses, across all research.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_active_surveys(&self) -> Result<u64, DatabaseError> {
        let tx = self.db().snapshot().await?;
        let count = read_active_survey_count(&tx).await?;
        tx.commit().await?;
        Ok(count)
    }
}
