use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::catalog::{self, CustomActionDraft};
use crate::config::TrackerConfig;
use crate::error::LoggerError;
use crate::metrics::DailyStats;
use crate::models::{ActionId, Category, EcoAction, EcoLogEntry};
use crate::storage::UserStore;

pub const VOICE_ICON: &str = "🗣️";

/// State behind the eco-action logging screen.
///
/// Holds only view state (search, selected date, pending delete, custom
/// form). Catalog and history are read from, and mutated through, the store.
pub struct ActionLogger<S: UserStore> {
    store: S,
    config: TrackerConfig,
    query: String,
    category: Option<Category>,
    selected_day: Option<NaiveDate>,
    pending_delete: Option<EcoAction>,
    custom_draft: Option<CustomActionDraft>,
}

impl<S: UserStore> ActionLogger<S> {
    pub fn new(store: S, config: TrackerConfig) -> Self {
        Self {
            store,
            config,
            query: String::new(),
            category: None,
            selected_day: None,
            pending_delete: None,
            custom_draft: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// `None` shows every category.
    pub fn select_category(&mut self, category: Option<Category>) {
        self.category = category;
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.category.as_ref()
    }

    pub fn filtered_actions(&self) -> Result<Vec<EcoAction>, LoggerError> {
        let actions = self.store.list_actions()?;
        Ok(catalog::filter_actions(&actions, &self.query, self.category.as_ref())
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn categories(&self) -> Result<Vec<Category>, LoggerError> {
        Ok(catalog::categories(&self.store.list_actions()?))
    }

    pub fn recently_used(&self) -> Result<Vec<EcoAction>, LoggerError> {
        let logs = self.store.list_logs()?;
        let actions = self.store.list_actions()?;
        Ok(catalog::recently_used(&logs, &actions, self.config.recent_limit))
    }

    /// Pick the day new entries are logged on. Days after today are refused.
    pub fn select_date<Tz: TimeZone>(
        &mut self,
        day: NaiveDate,
        now: &DateTime<Tz>,
    ) -> Result<(), LoggerError> {
        let today = now.date_naive();
        if day > today {
            return Err(LoggerError::DateInFuture(day));
        }
        self.selected_day = if day == today { None } else { Some(day) };
        Ok(())
    }

    pub fn selected_date<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> NaiveDate {
        self.selected_day.unwrap_or_else(|| now.date_naive())
    }

    /// Log `action` on the selected day.
    pub fn log_action(&mut self, action: &EcoAction) -> Result<EcoLogEntry, LoggerError> {
        self.log_action_at(action, &Local::now())
    }

    /// Log `action` on the selected day, taking the clock and time zone from `now`.
    pub fn log_action_at<Tz: TimeZone>(
        &mut self,
        action: &EcoAction,
        now: &DateTime<Tz>,
    ) -> Result<EcoLogEntry, LoggerError> {
        let date = match self.selected_day {
            Some(day) => timestamp_on(&now.timezone(), day, now.time()),
            None => now.with_timezone(&Utc),
        };
        Ok(self.store.add_action(action, date)?)
    }

    pub fn log_action_by_id(&mut self, id: &ActionId) -> Result<EcoLogEntry, LoggerError> {
        let action = self
            .store
            .load_action(id)?
            .ok_or_else(|| LoggerError::UnknownAction(id.0.clone()))?;
        self.log_action(&action)
    }

    /// Log a recognized voice transcript as a one-off action. The action is
    /// not added to the catalog. Blank transcripts are ignored.
    pub fn log_transcript(&mut self, text: &str) -> Result<Option<EcoLogEntry>, LoggerError> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        let action = EcoAction {
            id: ActionId::generate("voice"),
            name: text.to_string(),
            category: Category::new(Category::OTHER),
            impact: self.config.default_impact,
            icon: VOICE_ICON.to_string(),
        };
        self.log_action(&action).map(Some)
    }

    /// First step of deleting: remember which action the user picked.
    pub fn request_delete(&mut self, id: &ActionId) -> Result<(), LoggerError> {
        let action = self
            .store
            .load_action(id)?
            .ok_or_else(|| LoggerError::UnknownAction(id.0.clone()))?;
        self.pending_delete = Some(action);
        Ok(())
    }

    pub fn pending_delete(&self) -> Option<&EcoAction> {
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Second step: remove the picked action from the catalog.
    pub fn confirm_delete(&mut self) -> Result<Option<EcoAction>, LoggerError> {
        let action = self
            .pending_delete
            .take()
            .ok_or(LoggerError::NoPendingDelete)?;
        let removed = self.store.remove_action(&action.id)?;
        tracing::info!(action_id = %action.id, name = %action.name, "deleted action");
        Ok(removed)
    }

    pub fn open_custom_form(&mut self) {
        if self.custom_draft.is_none() {
            self.custom_draft = Some(CustomActionDraft::new(&self.config));
        }
    }

    pub fn custom_draft(&self) -> Option<&CustomActionDraft> {
        self.custom_draft.as_ref()
    }

    pub fn custom_draft_mut(&mut self) -> Option<&mut CustomActionDraft> {
        self.custom_draft.as_mut()
    }

    pub fn cancel_custom_form(&mut self) {
        self.custom_draft = None;
    }

    /// Add the drafted action. Does nothing while the form is closed or the
    /// name is blank; on success the form closes and the next one starts
    /// from the presets.
    pub fn save_custom_action(&mut self) -> Result<Option<EcoAction>, LoggerError> {
        let Some(new_action) = self
            .custom_draft
            .as_ref()
            .and_then(|draft| draft.build(&self.config))
        else {
            return Ok(None);
        };

        let action = self.store.add_custom_action(new_action)?;
        self.custom_draft = None;
        tracing::info!(action_id = %action.id, category = %action.category, "created custom action");
        Ok(Some(action))
    }

    pub fn daily_stats(&self, now: &DateTime<Local>) -> Result<DailyStats, LoggerError> {
        Ok(DailyStats::compute(&self.store.list_logs()?, now))
    }

    pub fn streak(&self) -> Result<u32, LoggerError> {
        Ok(self.store.streak()?)
    }
}

/// `time` on `day` in `zone`. When that wall-clock time is skipped by a clock
/// change, an hour later and then noon are tried; the result stays on `day`.
fn timestamp_on<Tz: TimeZone>(zone: &Tz, day: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let (hour_later, wrapped) = time.overflowing_add_signed(Duration::hours(1));
    let candidates = [
        Some(time),
        (wrapped == 0).then_some(hour_later),
        NaiveTime::from_hms_opt(12, 0, 0),
    ];
    for candidate in candidates.into_iter().flatten() {
        if let Some(local) = zone.from_local_datetime(&day.and_time(candidate)).earliest() {
            return local.with_timezone(&Utc);
        }
    }
    day.and_time(time).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{predefined_actions, ImpactInput};
    use crate::error::StoreError;
    use crate::models::{Impact, NewEcoAction};
    use crate::storage::MemoryStore;
    use chrono::{FixedOffset, LocalResult, NaiveDateTime, Timelike};

    /// UTC, except that `N` hours from 02:00 on 2024-03-10 never happen.
    #[derive(Clone, Copy, Debug)]
    struct SkippedHours<const N: u32>;

    type SpringForward = SkippedHours<1>;

    impl<const N: u32> SkippedHours<N> {
        fn gap_day() -> NaiveDate {
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        }

        fn offset() -> FixedOffset {
            FixedOffset::east_opt(0).unwrap()
        }
    }

    impl<const N: u32> TimeZone for SkippedHours<N> {
        type Offset = FixedOffset;

        fn from_offset(_offset: &FixedOffset) -> Self {
            SkippedHours
        }

        fn offset_from_local_date(&self, _local: &NaiveDate) -> LocalResult<FixedOffset> {
            LocalResult::Single(Self::offset())
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            if local.date() == Self::gap_day() && (2..2 + N).contains(&local.hour()) {
                LocalResult::None
            } else {
                LocalResult::Single(Self::offset())
            }
        }

        fn offset_from_utc_date(&self, _utc: &NaiveDate) -> FixedOffset {
            Self::offset()
        }

        fn offset_from_utc_datetime(&self, _utc: &NaiveDateTime) -> FixedOffset {
            Self::offset()
        }
    }

    fn at(day: NaiveDate, hour: u32, minute: u32) -> DateTime<SpringForward> {
        day.and_hms_opt(hour, minute, 0)
            .unwrap()
            .and_local_timezone(SkippedHours)
            .unwrap()
    }

    fn logger() -> ActionLogger<MemoryStore> {
        let store = MemoryStore::with_actions(predefined_actions()).unwrap();
        ActionLogger::new(store, TrackerConfig::default())
    }

    fn action_count(logger: &ActionLogger<MemoryStore>) -> usize {
        logger.store().list_actions().unwrap().len()
    }

    fn log_count(logger: &ActionLogger<MemoryStore>) -> usize {
        logger.store().list_logs().unwrap().len()
    }

    #[test]
    fn test_filter_uses_query_and_category() {
        let mut logger = logger();
        assert_eq!(logger.filtered_actions().unwrap().len(), 12);

        logger.set_query("REUSABLE");
        assert_eq!(logger.filtered_actions().unwrap().len(), 2);

        logger.select_category(Some(Category::new("waste")));
        let filtered = logger.filtered_actions().unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, ActionId("reusable-bag".to_string()));

        logger.set_query("");
        logger.select_category(None);
        assert_eq!(logger.filtered_actions().unwrap().len(), 12);
    }

    #[test]
    fn test_categories_follow_catalog() {
        let categories = logger().categories().unwrap();
        assert_eq!(categories.len(), 7);
        assert_eq!(categories[0], Category::new("transport"));
    }

    #[test]
    fn test_each_log_appends_one_entry() {
        let mut logger = logger();
        let bike = ActionId("bike-commute".to_string());

        for expected in 1..=3 {
            logger.log_action_by_id(&bike).unwrap();
            assert_eq!(log_count(&logger), expected);
        }
    }

    #[test]
    fn test_recently_used_is_bounded_and_distinct() {
        let mut logger = logger();
        let actions = predefined_actions();
        for action in actions.iter().take(7) {
            logger.log_action(action).unwrap();
        }
        logger.log_action(&actions[2]).unwrap();

        let recent = logger.recently_used().unwrap();
        let ids: Vec<&str> = recent.iter().map(|a| a.id.as_str()).collect();

        assert_eq!(recent.len(), 5);
        assert_eq!(ids[0], "walk-errand");
        assert_eq!(ids[1], "air-dry");
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_log_unknown_action_fails() {
        let mut logger = logger();
        assert_eq!(
            logger.log_action_by_id(&ActionId("missing".to_string())),
            Err(LoggerError::UnknownAction("missing".to_string()))
        );
        assert_eq!(log_count(&logger), 0);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut logger = logger();
        let bag = ActionId("reusable-bag".to_string());

        logger.request_delete(&bag).unwrap();
        assert_eq!(logger.pending_delete().map(|a| &a.id), Some(&bag));
        assert_eq!(action_count(&logger), 12);

        logger.cancel_delete();
        assert!(logger.pending_delete().is_none());
        assert_eq!(action_count(&logger), 12);
        assert_eq!(logger.confirm_delete(), Err(LoggerError::NoPendingDelete));

        logger.request_delete(&bag).unwrap();
        let removed = logger.confirm_delete().unwrap();

        assert_eq!(removed.map(|a| a.id), Some(bag.clone()));
        assert!(logger.pending_delete().is_none());
        assert_eq!(action_count(&logger), 11);
        assert!(logger.store().load_action(&bag).unwrap().is_none());
    }

    #[test]
    fn test_request_delete_unknown_action() {
        let mut logger = logger();
        assert!(matches!(
            logger.request_delete(&ActionId("missing".to_string())),
            Err(LoggerError::UnknownAction(_))
        ));
        assert!(logger.pending_delete().is_none());
    }

    #[test]
    fn test_deleted_action_stays_in_history() {
        let mut logger = logger();
        let bike = ActionId("bike-commute".to_string());
        logger.log_action_by_id(&bike).unwrap();

        logger.request_delete(&bike).unwrap();
        logger.confirm_delete().unwrap();

        let recent = logger.recently_used().unwrap();
        assert_eq!(recent[0].name, "Biked instead of driving");
        assert_eq!(recent[0].impact.co2_saved, 2.6);
    }

    #[test]
    fn test_create_custom_action() {
        let mut logger = logger();
        logger.open_custom_form();
        {
            let draft = logger.custom_draft_mut().unwrap();
            draft.name = "Used a bamboo toothbrush".to_string();
            draft.category = Category::new("other");
            draft.impact = ImpactInput::from_values(Impact::new(1.0, 0.2, 0.5, 0.3));
        }

        let created = logger.save_custom_action().unwrap().unwrap();

        assert_eq!(action_count(&logger), 13);
        assert_eq!(created.name, "Used a bamboo toothbrush");
        assert_eq!(created.category, Category::new("other"));
        assert_eq!(created.impact, Impact::new(1.0, 0.2, 0.5, 0.3));
        assert!(predefined_actions().iter().all(|a| a.id != created.id));
        assert_eq!(logger.store().load_action(&created.id).unwrap(), Some(created));
        assert!(logger.custom_draft().is_none());
    }

    #[test]
    fn test_blank_custom_name_is_noop() {
        let mut logger = logger();
        assert_eq!(logger.save_custom_action().unwrap(), None);

        logger.open_custom_form();
        logger.custom_draft_mut().unwrap().name = "   ".to_string();

        assert_eq!(logger.save_custom_action().unwrap(), None);
        assert_eq!(action_count(&logger), 12);
        assert!(logger.custom_draft().is_some());
    }

    #[test]
    fn test_custom_form_starts_from_presets() {
        let mut logger = logger();
        logger.open_custom_form();
        logger.custom_draft_mut().unwrap().name = "Carpooled".to_string();
        let created = logger.save_custom_action().unwrap().unwrap();

        assert_eq!(created.category, Category::new("transport"));
        assert_eq!(created.impact, Impact::new(1.0, 0.2, 0.5, 0.3));

        logger.open_custom_form();
        assert_eq!(logger.custom_draft().unwrap().name, "");
    }

    #[test]
    fn test_select_future_date_rejected() {
        let mut logger = logger();
        let now = Local::now();
        let tomorrow = now.date_naive() + Duration::days(1);

        assert_eq!(
            logger.select_date(tomorrow, &now),
            Err(LoggerError::DateInFuture(tomorrow))
        );
        assert_eq!(logger.selected_date(&now), now.date_naive());
    }

    #[test]
    fn test_log_on_past_date() {
        let mut logger = logger();
        let now = Local::now();
        let last_week = now.date_naive() - Duration::days(7);
        logger.select_date(last_week, &now).unwrap();

        let entry = logger.log_action(&predefined_actions()[0]).unwrap();

        assert_eq!(entry.date.with_timezone(&Local).date_naive(), last_week);
        assert_eq!(logger.daily_stats(&now).unwrap().actions_logged, 0);
    }

    #[test]
    fn test_log_on_day_with_skipped_hour_keeps_day() {
        let mut logger = logger();
        let zone: SpringForward = SkippedHours;
        let day = SpringForward::gap_day();
        let now = at(day.succ_opt().unwrap(), 2, 30);
        logger.select_date(day, &now).unwrap();

        let entry = logger.log_action_at(&predefined_actions()[0], &now).unwrap();
        let logged = entry.date.with_timezone(&zone);

        assert_eq!(logged.date_naive(), day);
        assert_eq!(logged.time(), NaiveTime::from_hms_opt(3, 30, 0).unwrap());
    }

    #[test]
    fn test_log_on_selected_day_keeps_time_of_day() {
        let mut logger = logger();
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = NaiveDate::from_ymd_opt(2024, 3, 12)
            .unwrap()
            .and_hms_opt(0, 30, 0)
            .unwrap()
            .and_local_timezone(plus_two)
            .unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        logger.select_date(day, &now).unwrap();

        let entry = logger.log_action_at(&predefined_actions()[0], &now).unwrap();

        // 00:30 at UTC+2 is the previous evening in UTC
        assert_eq!(entry.date.to_rfc3339(), "2024-03-07T22:30:00+00:00");
        assert_eq!(entry.date.with_timezone(&plus_two).date_naive(), day);
    }

    #[test]
    fn test_timestamp_on_falls_back_to_noon() {
        let zone: SkippedHours<2> = SkippedHours;
        let day = SkippedHours::<2>::gap_day();

        let stamp = timestamp_on(&zone, day, NaiveTime::from_hms_opt(2, 15, 0).unwrap());

        assert_eq!(stamp.date_naive(), day);
        assert_eq!(stamp.time(), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        assert_eq!(
            timestamp_on(&zone, day, NaiveTime::from_hms_opt(4, 15, 0).unwrap()).time(),
            NaiveTime::from_hms_opt(4, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_daily_stats_and_streak_today() {
        let mut logger = logger();
        let actions = predefined_actions();
        logger.log_action(&actions[0]).unwrap();
        logger.log_action(&actions[3]).unwrap();

        let stats = logger.daily_stats(&Local::now()).unwrap();
        assert_eq!(stats.actions_logged, 2);
        assert_eq!(stats.co2_display(), "4.1");
        assert_eq!(logger.streak().unwrap(), 1);
    }

    #[test]
    fn test_log_transcript() {
        let mut logger = logger();
        assert_eq!(logger.log_transcript("  ").unwrap(), None);

        let entry = logger
            .log_transcript("Used a reusable water bottle today")
            .unwrap()
            .unwrap();

        assert!(entry.action_id.as_str().starts_with("voice-"));
        assert_eq!(entry.category, Category::new("other"));
        assert_eq!(entry.impact, Impact::new(1.0, 0.2, 0.5, 0.3));
        assert_eq!(action_count(&logger), 12);
        assert_eq!(logger.recently_used().unwrap()[0].name, "Used a reusable water bottle today");
    }

    struct OfflineStore;

    impl UserStore for OfflineStore {
        fn list_actions(&self) -> Result<Vec<EcoAction>, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
        fn load_action(&self, _id: &ActionId) -> Result<Option<EcoAction>, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
        fn list_logs(&self) -> Result<Vec<EcoLogEntry>, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
        fn streak(&self) -> Result<u32, StoreError> {
            Ok(0)
        }
        fn insert_action(&mut self, _action: EcoAction) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
        fn add_action(
            &mut self,
            _action: &EcoAction,
            _date: DateTime<Utc>,
        ) -> Result<EcoLogEntry, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
        fn remove_action(&mut self, _id: &ActionId) -> Result<Option<EcoAction>, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
        fn add_custom_action(&mut self, _action: NewEcoAction) -> Result<EcoAction, StoreError> {
            Err(StoreError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_store_errors_propagate() {
        let mut logger = ActionLogger::new(OfflineStore, TrackerConfig::default());
        assert!(matches!(
            logger.filtered_actions(),
            Err(LoggerError::Store(StoreError::Unavailable(_)))
        ));

        logger.open_custom_form();
        logger.custom_draft_mut().unwrap().name = "Planted a tree".to_string();
        assert!(logger.save_custom_action().is_err());
        assert!(logger.custom_draft().is_some());
    }
}
