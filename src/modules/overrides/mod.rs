//! Admin editing of permission overrides for a role or a single user.

pub mod model;
pub mod service;

pub use model::{OverrideRow, PlannedWrite, ResourceSaveResult, SaveOutcome, SaveReport};
pub use service::OverrideEditor;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::modules::menu::school_menu;
    use sekolah_client::{ClientError, InMemoryOverrideStore};
    use sekolah_core::{
        AccessLevel, FULL_PERMISSIONS, NONE, Permission, READ_ONLY_PERMISSIONS, Role,
        VIEW_EDIT_PERMISSIONS,
    };
    use sekolah_models::{OverrideId, OverrideTarget, TargetType};

    fn editor(store: &Arc<InMemoryOverrideStore>, role: Role) -> OverrideEditor<Arc<InMemoryOverrideStore>> {
        OverrideEditor::for_role(Arc::clone(store), school_menu(), role, NONE)
    }

    #[test]
    fn test_staging_the_committed_value_clears_pending() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let mut editor = editor(&store, Role::Guru);

        editor.stage_level("nilai", AccessLevel::Full).unwrap();
        assert!(editor.has_pending());
        assert_eq!(editor.current("nilai"), FULL_PERMISSIONS);

        editor.stage_level("nilai", AccessLevel::ViewEdit).unwrap();
        assert!(!editor.has_pending());
    }

    #[test]
    fn test_custom_level_cannot_be_staged() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let mut editor = editor(&store, Role::Guru);
        let err = editor.stage_level("nilai", AccessLevel::Custom).unwrap_err();
        assert_eq!(err.status.as_u16(), 400);
    }

    #[test]
    fn test_unknown_resource_cannot_be_staged() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let mut editor = editor(&store, Role::Guru);
        let err = editor
            .stage_permission("tidak_ada", FULL_PERMISSIONS)
            .unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
    }

    #[test]
    fn test_plan_without_existing_override() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let editor = editor(&store, Role::Guru);
        assert_eq!(editor.plan("nilai", VIEW_EDIT_PERMISSIONS), PlannedWrite::Nothing);
        assert!(matches!(
            editor.plan("nilai", FULL_PERMISSIONS),
            PlannedWrite::Create(dto) if dto.target_type == TargetType::Role && dto.target_id == "Guru"
        ));
    }

    #[tokio::test]
    async fn test_plan_with_existing_override() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let mut editor = editor(&store, Role::Guru);
        editor.stage_permission("nilai", FULL_PERMISSIONS).unwrap();
        editor.save().await;
        let id = editor.saved("nilai").unwrap().id;

        assert_eq!(editor.plan("nilai", VIEW_EDIT_PERMISSIONS), PlannedWrite::Delete(id));
        assert_eq!(editor.plan("nilai", FULL_PERMISSIONS), PlannedWrite::Nothing);
        assert_eq!(
            editor.plan("nilai", READ_ONLY_PERMISSIONS),
            PlannedWrite::Update(id, READ_ONLY_PERMISSIONS.into())
        );
    }

    #[tokio::test]
    async fn test_save_create_update_and_revert() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let mut editor = editor(&store, Role::PetugasKeuangan);

        editor.stage_level("tagihan", AccessLevel::Full).unwrap();
        let report = editor.save().await;
        assert!(report.is_success());
        assert!(matches!(
            report.outcome("tagihan"),
            Some(Ok(SaveOutcome::Created(_)))
        ));
        assert_eq!(store.len(), 1);
        assert!(!editor.has_pending());

        editor.stage_level("tagihan", AccessLevel::View).unwrap();
        let report = editor.save().await;
        assert!(matches!(
            report.outcome("tagihan"),
            Some(Ok(SaveOutcome::Updated(_)))
        ));
        let target = OverrideTarget::Role(Role::PetugasKeuangan);
        assert_eq!(
            store.find(&target, "tagihan").unwrap().permission(),
            READ_ONLY_PERMISSIONS
        );

        editor.stage_reset("tagihan").unwrap();
        let report = editor.save().await;
        assert!(matches!(report.outcome("tagihan"), Some(Ok(SaveOutcome::Deleted))));
        assert!(store.is_empty());
        assert_eq!(editor.current("tagihan"), VIEW_EDIT_PERMISSIONS);
    }

    #[tokio::test]
    async fn test_failed_keys_stay_pending() {
        let store = Arc::new(InMemoryOverrideStore::new());
        store.fail_writes_for("absensi");
        let mut editor = editor(&store, Role::Guru);

        editor.stage_level("nilai", AccessLevel::Full).unwrap();
        editor.stage_level("absensi", AccessLevel::Full).unwrap();
        let report = editor.save().await;

        assert!(!report.is_success());
        assert_eq!(report.failed_keys(), vec!["absensi"]);
        assert_eq!(report.succeeded().count(), 1);
        assert_eq!(
            editor.pending().keys().collect::<Vec<_>>(),
            vec!["absensi"]
        );
        assert!(editor.saved("nilai").is_some());

        store.clear_failures();
        let report = editor.save().await;
        assert!(report.is_success());
        assert!(!editor.has_pending());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_create_conflict_overwrites_other_admin() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let mut mine = editor(&store, Role::Guru);
        let mut theirs = editor(&store, Role::Guru);

        theirs.stage_level("nilai", AccessLevel::View).unwrap();
        theirs.save().await;

        mine.stage_level("nilai", AccessLevel::Full).unwrap();
        let report = mine.save().await;
        assert!(matches!(report.outcome("nilai"), Some(Ok(SaveOutcome::Updated(_)))));
        assert_eq!(store.len(), 1);
        assert_eq!(store.all()[0].permission(), FULL_PERMISSIONS);
    }

    #[tokio::test]
    async fn test_vanished_records_are_recreated_or_ignored() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let mut mine = editor(&store, Role::Guru);
        mine.stage_level("nilai", AccessLevel::Full).unwrap();
        mine.stage_level("absensi", AccessLevel::Full).unwrap();
        mine.save().await;

        for record in store.all() {
            sekolah_client::OverrideStore::delete(store.as_ref(), record.id)
                .await
                .unwrap();
        }

        mine.stage_level("nilai", AccessLevel::View).unwrap();
        mine.stage_reset("absensi").unwrap();
        let report = mine.save().await;
        assert!(report.is_success());
        assert!(matches!(report.outcome("nilai"), Some(Ok(SaveOutcome::Created(_)))));
        assert!(matches!(report.outcome("absensi"), Some(Ok(SaveOutcome::Deleted))));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_discards_pending_and_skips_stale_keys() {
        let store = Arc::new(InMemoryOverrideStore::new());
        store.seed(sekolah_models::Override {
            id: OverrideId::new(7),
            target_type: TargetType::Role,
            target_id: "Guru".to_string(),
            resource_key: "modul_lama".to_string(),
            view: true,
            create: false,
            edit: false,
            delete: false,
        });
        let mut editor = editor(&store, Role::Guru);
        editor.stage_level("nilai", AccessLevel::Full).unwrap();

        editor.refresh().await.unwrap();
        assert!(!editor.has_pending());
        assert!(editor.saved("modul_lama").is_none());
        assert!(editor.rows().iter().all(|row| !row.is_overridden()));
    }

    fn base_equal_override(id: i64) -> sekolah_models::Override {
        sekolah_models::Override {
            id: OverrideId::new(id),
            target_type: TargetType::Role,
            target_id: "Guru".to_string(),
            resource_key: "nilai".to_string(),
            view: true,
            create: false,
            edit: true,
            delete: false,
        }
    }

    #[tokio::test]
    async fn test_reset_deletes_override_equal_to_base() {
        let store = Arc::new(InMemoryOverrideStore::new());
        store.seed(base_equal_override(11));
        let mut editor = editor(&store, Role::Guru);
        editor.refresh().await.unwrap();
        assert_eq!(editor.committed("nilai"), editor.base("nilai"));

        editor.stage_reset("nilai").unwrap();
        assert!(editor.pending().contains_key("nilai"));

        let report = editor.save().await;
        assert!(matches!(
            report.outcome("nilai"),
            Some(Ok(SaveOutcome::Deleted))
        ));
        assert!(store.is_empty());
        assert!(editor.saved("nilai").is_none());
    }

    #[tokio::test]
    async fn test_selecting_base_level_deletes_override_equal_to_base() {
        let store = Arc::new(InMemoryOverrideStore::new());
        store.seed(base_equal_override(12));
        let mut editor = editor(&store, Role::Guru);
        editor.refresh().await.unwrap();

        editor.stage_level("nilai", AccessLevel::ViewEdit).unwrap();
        let report = editor.save().await;
        assert!(!report.is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_failure_is_reported() {
        let store = Arc::new(InMemoryOverrideStore::new());
        store.set_list_unavailable(true);
        let mut editor = editor(&store, Role::Guru);
        assert!(matches!(
            editor.refresh().await,
            Err(ClientError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_user_editor_uses_user_role_as_base() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let mut editor =
            OverrideEditor::for_user(Arc::clone(&store), school_menu(), "42", Role::Guru, NONE);
        assert_eq!(editor.base("nilai"), VIEW_EDIT_PERMISSIONS);

        editor
            .stage_permission("nilai", Permission::new(true, false, false, true))
            .unwrap();
        assert_eq!(editor.level("nilai"), AccessLevel::Custom);
        editor.save().await;

        let record = store.find(&OverrideTarget::user("42"), "nilai").unwrap();
        assert_eq!(record.target_type, TargetType::User);
    }

    #[test]
    fn test_rows_follow_menu_order() {
        let store = Arc::new(InMemoryOverrideStore::new());
        let mut editor = editor(&store, Role::Guru);
        editor.stage_level("absensi", AccessLevel::Full).unwrap();

        let rows = editor.rows();
        assert_eq!(rows[0].resource_key, "dashboard");
        assert_eq!(rows[0].group, None);

        let absensi = rows.iter().find(|r| r.resource_key == "absensi").unwrap();
        assert_eq!(absensi.group.as_deref(), Some("Akademik"));
        assert!(absensi.is_dirty());
        assert_eq!(absensi.level, AccessLevel::Full);
        assert_eq!(absensi.pending, Some(FULL_PERMISSIONS));
    }
}
