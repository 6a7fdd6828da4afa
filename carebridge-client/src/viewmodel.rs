//! Generic list / create / update / delete state for one resource page.

use serde::de::IgnoredAny;
use tracing::{debug, info, warn};

use crate::{
    error::{ClientError, FieldError},
    http::ApiClient,
    resource::{Card, Resource, ResourceDescriptor},
};

/// State behind a resource page.
///
/// Operations record their own failures in [`CrudViewModel::last_error`];
/// the returned `Result` tells the caller what happened but the view-model is
/// always left consistent. Records are kept in server order and are fully
/// re-fetched after every successful mutation.
#[derive(Debug)]
pub struct CrudViewModel<R: Resource> {
    client: ApiClient,
    records: Vec<R>,
    form: R::Draft,
    editing: Option<(i64, R::Draft)>,
    loading: bool,
    last_error: Option<String>,
    notice: Option<String>,
    field_errors: Vec<FieldError>,
    filter: String,
}

impl<R: Resource> CrudViewModel<R> {
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            records: Vec::new(),
            form: R::Draft::default(),
            editing: None,
            loading: false,
            last_error: None,
            notice: None,
            field_errors: Vec::new(),
            filter: String::new(),
        }
    }

    #[must_use]
    pub fn descriptor(&self) -> ResourceDescriptor {
        R::DESCRIPTOR
    }

    /// Replace the records with the server's current collection.
    ///
    /// On failure the previous records are kept and the error is recorded.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn list(&mut self) -> Result<(), ClientError> {
        let descriptor = R::DESCRIPTOR;
        self.loading = true;
        let result = self
            .client
            .get::<Option<Vec<R>>>(descriptor.collection_path)
            .await;
        self.loading = false;

        match result {
            Ok(records) => {
                self.records = records.unwrap_or_default();
                self.last_error = None;
                debug!(resource = descriptor.plural, count = self.records.len(), "loaded records");
                Ok(())
            }
            Err(err) => {
                self.fail(&err, &descriptor.fetch_failed());
                Err(err)
            }
        }
    }

    /// Submit `draft` as a new record, then reload.
    ///
    /// Empty required fields stop the request and are reported per field.
    /// On success the form is reset and a notice is set.
    ///
    /// # Errors
    /// * [`ClientError::Validation`] when required fields are empty.
    /// * See [`ApiClient::request`].
    pub async fn create(&mut self, draft: R::Draft) -> Result<(), ClientError> {
        let descriptor = R::DESCRIPTOR;
        let validated = self.check_required(&draft);
        self.form = draft;
        validated?;

        self.loading = true;
        let result = self
            .client
            .post::<IgnoredAny, _>(descriptor.create_path(), &self.form)
            .await;
        self.loading = false;

        match result {
            Ok(_) => {
                info!(resource = descriptor.singular, "created record");
                self.form = R::Draft::default();
                self.last_error = None;
                self.notice = Some(descriptor.created_notice());
                self.reload().await;
                Ok(())
            }
            Err(err) => {
                self.fail(&err, &descriptor.create_failed());
                Err(err)
            }
        }
    }

    /// Start editing the record with `id`, seeding the edit draft from it.
    /// Returns `false` when no such record is loaded.
    pub fn begin_edit(&mut self, id: i64) -> bool {
        match self.find(id) {
            Some(record) => {
                let draft = R::Draft::from(record);
                self.editing = Some((id, draft));
                self.field_errors.clear();
                true
            }
            None => false,
        }
    }

    /// The edit draft, for the form to modify in place.
    pub fn edit_draft_mut(&mut self) -> Option<&mut R::Draft> {
        self.editing.as_mut().map(|(_, draft)| draft)
    }

    #[must_use]
    pub fn editing(&self) -> Option<(i64, &R::Draft)> {
        self.editing.as_ref().map(|(id, draft)| (*id, draft))
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.field_errors.clear();
    }

    /// Replace record `id` with `patch`, then reload.
    ///
    /// # Errors
    /// * [`ClientError::Validation`] when required fields are empty.
    /// * See [`ApiClient::request`].
    pub async fn update(&mut self, id: i64, patch: R::Draft) -> Result<(), ClientError> {
        let descriptor = R::DESCRIPTOR;
        self.check_required(&patch)?;

        self.loading = true;
        let result = self
            .client
            .put::<IgnoredAny, _>(&descriptor.item_path(id), &patch)
            .await;
        self.loading = false;

        match result {
            Ok(_) => {
                info!(resource = descriptor.singular, id, "updated record");
                self.editing = None;
                self.last_error = None;
                self.notice = Some(descriptor.updated_notice());
                self.reload().await;
                Ok(())
            }
            Err(err) => {
                self.fail(&err, &descriptor.update_failed());
                Err(err)
            }
        }
    }

    /// Submit the current edit draft.
    ///
    /// # Errors
    /// [`ClientError::Validation`] without an edit in progress; otherwise see
    /// [`CrudViewModel::update`].
    pub async fn save_edit(&mut self) -> Result<(), ClientError> {
        let Some((id, draft)) = self.editing.clone() else {
            return Err(ClientError::Validation {
                fields: vec![FieldError::new("id", "Nothing is being edited")],
            });
        };
        self.update(id, draft).await
    }

    /// Delete record `id`, then reload.
    ///
    /// When the resource asks for confirmation, `confirm` sees the record (or
    /// `None` when `id` is not among the loaded records) and a `false` answer
    /// cancels without a request. Returns whether a delete was performed.
    ///
    /// # Errors
    /// See [`ApiClient::request`].
    pub async fn delete<F>(&mut self, id: i64, confirm: F) -> Result<bool, ClientError>
    where
        F: FnOnce(Option<&R>) -> bool,
    {
        let descriptor = R::DESCRIPTOR;
        if descriptor.confirm_delete {
            if !confirm(self.find(id)) {
                debug!(resource = descriptor.singular, id, "delete cancelled");
                return Ok(false);
            }
        }

        self.loading = true;
        let result = self
            .client
            .delete::<IgnoredAny>(&descriptor.item_path(id))
            .await;
        self.loading = false;

        match result {
            Ok(_) => {
                info!(resource = descriptor.singular, id, "deleted record");
                if self.editing.as_ref().is_some_and(|(editing, _)| *editing == id) {
                    self.editing = None;
                }
                self.last_error = None;
                self.notice = Some(descriptor.deleted_notice());
                self.reload().await;
                Ok(true)
            }
            Err(err) => {
                self.fail(&err, &descriptor.delete_failed());
                Err(err)
            }
        }
    }

    /// Set the local search text. Never touches the network.
    pub fn set_filter(&mut self, text: impl Into<String>) {
        self.filter = text.into();
    }

    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Records matching the search text, in server order.
    #[must_use]
    pub fn visible(&self) -> Vec<&R> {
        let needle = self.filter.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.iter().collect();
        }
        self.records
            .iter()
            .filter(|record| record.matches(&needle))
            .collect()
    }

    /// Cards for the visible records.
    #[must_use]
    pub fn cards(&self) -> Vec<Card> {
        self.visible().into_iter().map(Resource::card).collect()
    }

    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// The create form's current contents.
    #[must_use]
    pub fn form(&self) -> &R::Draft {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut R::Draft {
        &mut self.form
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    #[must_use]
    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// Message for `field`, if it failed validation.
    #[must_use]
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    fn find(&self, id: i64) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    fn check_required(&mut self, draft: &R::Draft) -> Result<(), ClientError> {
        let missing = R::missing_required(draft);
        self.field_errors = missing.into_iter().map(FieldError::required).collect();
        if self.field_errors.is_empty() {
            return Ok(());
        }
        let err = ClientError::Validation {
            fields: self.field_errors.clone(),
        };
        self.notice = None;
        self.last_error = Some(err.user_message(""));
        Err(err)
    }

    async fn reload(&mut self) {
        // A failed refresh is already recorded in last_error.
        let _ = self.list().await;
    }

    fn fail(&mut self, err: &ClientError, fallback: &str) {
        warn!(resource = R::DESCRIPTOR.plural, error = %err, "{fallback}");
        self.notice = None;
        self.last_error = Some(err.user_message(fallback));
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::token_store::MemoryTokenStore;
    use shared::models::{Beneficiary, BeneficiaryDraft, Story};
    use url::Url;

    fn view_model<R: Resource>() -> CrudViewModel<R> {
        // Port 9 (discard) is never listening; nothing in these tests may reach it.
        let client = ApiClient::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            Arc::new(MemoryTokenStore::new()),
        )
        .unwrap();
        CrudViewModel::new(client)
    }

    fn beneficiary(id: i64, name: &str, needs: &str) -> Beneficiary {
        Beneficiary {
            id,
            charity_id: Some(2),
            charity_name: None,
            name: name.to_string(),
            needs: needs.to_string(),
        }
    }

    #[tokio::test]
    async fn create_with_missing_fields_records_field_errors() {
        let mut vm = view_model::<Beneficiary>();
        let draft = BeneficiaryDraft {
            charity_id: None,
            name: "Jane".to_string(),
            needs: String::new(),
        };
        let err = vm.create(draft.clone()).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
        assert_eq!(vm.field_error("charity_id"), Some("Charity is required"));
        assert_eq!(vm.field_error("needs"), Some("Needs is required"));
        assert_eq!(vm.field_error("name"), None);
        assert_eq!(vm.form(), &draft);
        assert!(!vm.is_loading());
    }

    #[test]
    fn filter_is_local_and_reversible() {
        let mut vm = view_model::<Beneficiary>();
        vm.records = vec![
            beneficiary(1, "Jane", "school fees"),
            beneficiary(2, "Omar", "medicine"),
            beneficiary(3, "janet", "shelter"),
        ];

        vm.set_filter("JAN");
        let names: Vec<_> = vm.visible().iter().map(|record| record.name.as_str()).collect();
        assert_eq!(names, ["Jane", "janet"]);
        assert_eq!(vm.records().len(), 3);

        vm.set_filter("");
        assert_eq!(vm.visible().len(), 3);
    }

    #[test]
    fn edit_draft_lifecycle() {
        let mut vm = view_model::<Beneficiary>();
        vm.records = vec![beneficiary(5, "Jane", "school fees")];

        assert!(!vm.begin_edit(99));
        assert!(vm.editing().is_none());

        assert!(vm.begin_edit(5));
        vm.edit_draft_mut().unwrap().needs = "uniforms".to_string();
        let (id, draft) = vm.editing().unwrap();
        assert_eq!(id, 5);
        assert_eq!(draft.needs, "uniforms");

        vm.cancel_edit();
        assert!(vm.editing().is_none());
        assert!(vm.edit_draft_mut().is_none());
    }

    #[tokio::test]
    async fn declined_confirmation_skips_the_request() {
        let mut vm = view_model::<Story>();
        vm.records = vec![Story {
            id: 4,
            charity_id: None,
            title: "A new well".to_string(),
            content: "Clean water".to_string(),
            image_url: None,
        }];
        let deleted = vm
            .delete(4, |story| story.is_some_and(|story| story.title.is_empty()))
            .await
            .unwrap();
        assert!(!deleted);
        assert_eq!(vm.records().len(), 1);
        assert!(vm.last_error().is_none());
    }

    #[tokio::test]
    async fn save_edit_without_draft_is_rejected() {
        let mut vm = view_model::<Beneficiary>();
        assert!(matches!(
            vm.save_edit().await,
            Err(ClientError::Validation { .. })
        ));
    }
}
