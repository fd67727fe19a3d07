use std::sync::{Arc, RwLock};

use super::{Field, FieldKind, read_state, write_state};
use crate::date::{self, DateConfig, DateMode, EMPTY_DATE_TEXT};
use crate::notify::ChangeNotifier;
use crate::value::ExternalValue;

#[derive(Debug)]
struct DateState {
    instant: i64,
    empty: bool,
    display_text: String,
    error: Option<String>,
    disabled: bool,
    pending: Option<i64>,
}

#[derive(Debug)]
struct DateSettings {
    default_value: i64,
    default_instant: i64,
    mode: DateMode,
    config: DateConfig,
}

/// Calendar-day field exchanged as nullable epoch seconds.
///
/// The stored instant is always the start of a day: `floor(t / 86400) *
/// 86400` in UTC mode, `floor((t + o) / 86400) * 86400 - o` in local mode
/// where `o` is the configured zone's current offset. `value` returns the
/// stored instant unchanged, so feeding it back into `set_value` is a no-op
/// on the day.
///
/// A fresh field holds its converted default but reports itself empty until
/// a value is committed.
#[derive(Clone)]
pub struct DateField {
    state: Arc<RwLock<DateState>>,
    settings: Arc<DateSettings>,
    on_change: ChangeNotifier,
}

impl DateField {
    pub fn new(default_value: i64, mode: DateMode, config: DateConfig) -> Self {
        let offset = mode.offset(&config);
        let instant = mode.day_start(default_value, offset).unwrap_or_else(|| {
            tracing::warn!(default_value, "default date out of range, keeping it untruncated");
            default_value
        });
        let settings = DateSettings {
            default_value,
            default_instant: instant,
            mode,
            config,
        };
        Self {
            state: Arc::new(RwLock::new(DateState {
                instant,
                empty: true,
                display_text: EMPTY_DATE_TEXT.to_string(),
                error: None,
                disabled: false,
                pending: None,
            })),
            settings: Arc::new(settings),
            on_change: ChangeNotifier::new(),
        }
    }

    pub fn utc(default_value: i64) -> Self {
        Self::new(default_value, DateMode::Utc, DateConfig::default())
    }

    pub fn local(default_value: i64, config: DateConfig) -> Self {
        Self::new(default_value, DateMode::Local, config)
    }

    pub fn mode(&self) -> DateMode {
        self.settings.mode
    }

    pub fn default_value(&self) -> i64 {
        self.settings.default_value
    }

    pub fn config(&self) -> &DateConfig {
        &self.settings.config
    }

    /// Day-aligned instant, also when the field is empty.
    pub fn instant(&self) -> i64 {
        read_state(&self.state).instant
    }

    pub fn is_empty(&self) -> bool {
        read_state(&self.state).empty
    }

    pub fn display_text(&self) -> String {
        read_state(&self.state).display_text.clone()
    }

    /// User action clearing the date. Ignored while disabled.
    pub fn clear(&self) -> bool {
        if self.is_disabled() {
            return false;
        }
        self.reset();
        true
    }

    /// Opens a picker edit seeded with the current instant.
    pub fn begin_edit(&self) -> bool {
        let mut state = write_state(&self.state);
        if state.disabled {
            return false;
        }
        state.pending = Some(state.instant);
        true
    }

    pub fn is_editing(&self) -> bool {
        read_state(&self.state).pending.is_some()
    }

    pub fn pending(&self) -> Option<i64> {
        read_state(&self.state).pending
    }

    /// Updates the pending edit. A field disabled mid-edit drops the edit.
    pub fn set_pending(&self, time: i64) -> bool {
        let mut state = write_state(&self.state);
        if state.disabled {
            state.pending = None;
            return false;
        }
        match state.pending.as_mut() {
            Some(pending) => {
                *pending = time;
                true
            }
            None => false,
        }
    }

    /// Applies the pending edit as a user-committed value. Ignored, and the
    /// edit dropped, while disabled.
    pub fn commit_edit(&self) -> bool {
        let pending = {
            let mut state = write_state(&self.state);
            let pending = state.pending.take();
            if state.disabled {
                return false;
            }
            pending
        };
        match pending {
            Some(time) => {
                self.commit(time);
                true
            }
            None => false,
        }
    }

    /// Drops the pending edit. The committed instant is left as it was.
    pub fn cancel_edit(&self) {
        write_state(&self.state).pending = None;
    }

    /// Stores the day of `time`. A time whose day start overflows is treated
    /// as unparsable.
    fn commit(&self, time: i64) {
        let Some((instant, offset)) = self.settings.day_of(time) else {
            tracing::warn!(time, "date value out of range");
            self.reset();
            return;
        };
        let display_text = date::format_with_offset(instant, offset, &self.settings.config.pattern);
        {
            let mut state = write_state(&self.state);
            state.instant = instant;
            state.empty = false;
            state.display_text = display_text;
            state.error = None;
            state.pending = None;
        }
        self.on_change.trigger();
    }

    fn reset(&self) {
        {
            let mut state = write_state(&self.state);
            state.instant = self.settings.default_instant;
            state.empty = true;
            state.display_text = EMPTY_DATE_TEXT.to_string();
            state.pending = None;
        }
        self.on_change.trigger();
    }
}

impl DateSettings {
    /// Day start of `time` along with the offset used to find it.
    fn day_of(&self, time: i64) -> Option<(i64, i64)> {
        let offset = self.mode.offset(&self.config);
        Some((self.mode.day_start(time, offset)?, offset))
    }
}

impl Field for DateField {
    fn kind(&self) -> FieldKind {
        FieldKind::Date
    }

    fn value(&self) -> ExternalValue {
        let state = read_state(&self.state);
        if state.empty {
            ExternalValue::Null
        } else {
            ExternalValue::Int(state.instant)
        }
    }

    fn set_value(&self, value: ExternalValue) {
        match value {
            ExternalValue::Int(time) => self.commit(time),
            ExternalValue::Null => self.reset(),
            other => {
                tracing::warn!(kind = %other.kind(), "date field cannot parse value");
                self.reset();
            }
        }
    }

    fn error(&self) -> Option<String> {
        read_state(&self.state).error.clone()
    }

    fn set_error(&self, error: Option<String>) {
        write_state(&self.state).error = error;
    }

    fn is_disabled(&self) -> bool {
        read_state(&self.state).disabled
    }

    fn set_disabled(&self, disabled: bool) {
        write_state(&self.state).disabled = disabled;
    }

    fn on_change(&self) -> &ChangeNotifier {
        &self.on_change
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::{SECONDS_PER_DAY, SECONDS_PER_HOUR, TimeZoneSetting};

    const NOV_14_2023: i64 = 1_700_000_000;
    const NOV_14_2023_MIDNIGHT_UTC: i64 = 1_699_920_000;

    fn utc_plus_two() -> DateConfig {
        DateConfig::new().time_zone(TimeZoneSetting::Fixed(2 * 3_600))
    }

    #[test]
    fn new_field_is_empty_but_holds_default_day() {
        let field = DateField::utc(NOV_14_2023);
        assert!(field.is_empty());
        assert_eq!(field.value(), ExternalValue::Null);
        assert_eq!(field.instant(), NOV_14_2023_MIDNIGHT_UTC);
        assert_eq!(field.display_text(), "-");
    }

    #[test]
    fn utc_value_truncates_to_midnight() {
        let field = DateField::utc(0);
        field.set_value(ExternalValue::Int(NOV_14_2023));
        assert!(!field.is_empty());
        assert_eq!(field.value(), ExternalValue::Int(NOV_14_2023_MIDNIGHT_UTC));
        assert_eq!(field.display_text(), "2023-11-14");

        field.set_value(ExternalValue::Null);
        assert!(field.is_empty());
        assert_eq!(field.value(), ExternalValue::Null);
        assert_eq!(field.instant(), 0);
    }

    #[test]
    fn local_mode_uses_configured_offset() {
        let field = DateField::local(0, utc_plus_two());
        field.set_value(ExternalValue::Int(NOV_14_2023));

        let expected = NOV_14_2023_MIDNIGHT_UTC + SECONDS_PER_DAY - 2 * SECONDS_PER_HOUR;
        assert_eq!(field.value(), ExternalValue::Int(expected));
        assert_eq!(field.display_text(), "2023-11-15");
    }

    #[test]
    fn value_round_trips_at_day_granularity() {
        for field in [DateField::utc(0), DateField::local(0, utc_plus_two())] {
            field.set_value(ExternalValue::Int(NOV_14_2023 + 123));
            let first = field.value();
            field.set_value(first.clone());
            assert_eq!(field.value(), first);
        }
    }

    #[test]
    fn unparsable_value_resets_to_default() {
        let field = DateField::utc(NOV_14_2023);
        field.set_value(ExternalValue::Int(0));
        field.set_error(Some("Invalid".into()));

        field.set_value(ExternalValue::Text("tomorrow".into()));
        assert!(field.is_empty());
        assert_eq!(field.instant(), NOV_14_2023_MIDNIGHT_UTC);
        assert_eq!(field.display_text(), "-");
    }

    #[test]
    fn commit_applies_pending_edit() {
        let field = DateField::utc(0);
        field.set_error(Some("Required".into()));
        assert!(!field.set_pending(NOV_14_2023));

        assert!(field.begin_edit());
        assert_eq!(field.pending(), Some(0));
        assert!(field.set_pending(NOV_14_2023));
        assert!(field.commit_edit());

        assert!(!field.is_editing());
        assert_eq!(field.value(), ExternalValue::Int(NOV_14_2023_MIDNIGHT_UTC));
        assert_eq!(field.error(), None);
        assert!(!field.commit_edit());
    }

    #[test]
    fn cancel_keeps_previous_day() {
        let field = DateField::utc(0);
        field.set_value(ExternalValue::Int(NOV_14_2023));

        assert!(field.begin_edit());
        field.set_pending(NOV_14_2023 + 10 * SECONDS_PER_DAY);
        field.cancel_edit();

        assert!(!field.is_editing());
        assert_eq!(field.value(), ExternalValue::Int(NOV_14_2023_MIDNIGHT_UTC));
    }

    #[test]
    fn disabled_field_rejects_user_actions() {
        let field = DateField::utc(0);
        field.set_value(ExternalValue::Int(NOV_14_2023));
        field.set_disabled(true);

        assert!(!field.begin_edit());
        assert!(!field.clear());
        assert!(!field.is_empty());
    }

    #[test]
    fn commit_after_disable_is_ignored() {
        let field = DateField::utc(0);
        assert!(field.begin_edit());
        field.set_disabled(true);

        assert!(!field.set_pending(3 * SECONDS_PER_DAY));
        assert!(!field.is_editing());
        assert!(!field.commit_edit());
        assert!(field.is_empty());
        assert_eq!(field.value(), ExternalValue::Null);

        field.set_disabled(false);
        assert!(field.begin_edit());
        field.set_disabled(true);
        assert!(!field.commit_edit());
        assert!(!field.is_editing());
        assert_eq!(field.value(), ExternalValue::Null);
    }

    #[test]
    fn extreme_timestamps_reset_instead_of_overflowing() {
        let plus_one = DateConfig::new().time_zone(TimeZoneSetting::Fixed(3_600));
        let minus_one = DateConfig::new().time_zone(TimeZoneSetting::Fixed(-3_600));
        let fields = [
            (DateField::utc(NOV_14_2023), i64::MIN),
            (DateField::local(NOV_14_2023, plus_one.clone()), i64::MAX),
            (DateField::local(NOV_14_2023, minus_one), i64::MIN),
        ];
        for (field, extreme) in fields {
            let default_day = field.instant();
            field.set_value(ExternalValue::Int(NOV_14_2023));
            assert!(!field.is_empty());

            field.set_value(ExternalValue::Int(extreme));
            assert!(field.is_empty());
            assert_eq!(field.value(), ExternalValue::Null);
            assert_eq!(field.instant(), default_day);
            assert_eq!(field.display_text(), "-");
        }

        // Day starts that still fit are committed.
        let field = DateField::utc(0);
        field.set_value(ExternalValue::Int(i64::MAX));
        assert!(!field.is_empty());

        let field = DateField::local(i64::MAX, plus_one);
        assert_eq!(field.instant(), i64::MAX);
        field.set_value(ExternalValue::Null);
        assert_eq!(field.instant(), i64::MAX);
    }

    #[test]
    fn custom_pattern_drives_display_text() {
        let field = DateField::new(0, DateMode::Utc, DateConfig::new().pattern("dd.MM.yyyy"));
        field.set_value(ExternalValue::Int(NOV_14_2023));
        assert_eq!(field.display_text(), "14.11.2023");
        assert_eq!(field.config().pattern, "dd.MM.yyyy");
        assert_eq!(field.mode(), DateMode::Utc);
        assert_eq!(field.default_value(), 0);
    }
}
