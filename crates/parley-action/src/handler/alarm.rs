//! Alarm action handler.
//!
//! Sets a wall-clock alarm from `extras.hour` and `extras.minutes`.

use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::types::{ActionDescriptor, ActionResult};

pub const ACTION_SET_ALARM: &str = "android.intent.action.SET_ALARM";

/// Handler for set-alarm actions.
pub struct AlarmHandler;

fn alarm_time(action: &ActionDescriptor) -> Result<(u64, u64), ActionError> {
    let hour = action
        .extra_u64("hour")
        .filter(|h| *h < 24)
        .ok_or_else(|| ActionError::InvalidPayload("Alarm hour must be 0-23".to_string()))?;
    let minutes = match action.extras.get("minutes") {
        None => 0,
        Some(_) => action
            .extra_u64("minutes")
            .filter(|m| *m < 60)
            .ok_or_else(|| {
                ActionError::InvalidPayload("Alarm minutes must be 0-59".to_string())
            })?,
    };
    Ok((hour, minutes))
}

impl ActionHandler for AlarmHandler {
    fn id(&self) -> &'static str {
        "alarm"
    }

    fn can_handle(&self, action: &ActionDescriptor) -> bool {
        action.is_action(ACTION_SET_ALARM) && alarm_time(action).is_ok()
    }

    fn launch(&self, action: &ActionDescriptor) -> Result<ActionResult, ActionError> {
        let (hour, minutes) = alarm_time(action)?;
        let label = action.extra_str("message").unwrap_or("");

        tracing::info!(hour, minutes, label = %label, "Alarm set");

        Ok(ActionResult {
            handler: self.id().to_string(),
            message: format!("Alarm set for {:02}:{:02}", hour, minutes),
        })
    }

    fn describe(&self, action: &ActionDescriptor) -> String {
        match alarm_time(action) {
            Ok((hour, minutes)) => format!("Set alarm: {:02}:{:02}", hour, minutes),
            Err(_) => "Set alarm: <invalid time>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alarm(extras: serde_json::Value) -> ActionDescriptor {
        ActionDescriptor {
            action: Some(ACTION_SET_ALARM.to_string()),
            extras: extras.as_object().cloned().unwrap_or_default(),
            ..Default::default()
        }
    }

    #[test]
    fn test_alarm_from_strings() {
        let handler = AlarmHandler;
        let action = alarm(serde_json::json!({"hour": "07", "minutes": "30"}));
        assert!(handler.can_handle(&action));
        let result = handler.launch(&action).unwrap();
        assert_eq!(result.message, "Alarm set for 07:30");
    }

    #[test]
    fn test_alarm_from_numbers() {
        let handler = AlarmHandler;
        let action = alarm(serde_json::json!({"hour": 23, "minutes": 5}));
        assert_eq!(handler.launch(&action).unwrap().message, "Alarm set for 23:05");
    }

    #[test]
    fn test_alarm_minutes_default_to_zero() {
        let handler = AlarmHandler;
        let action = alarm(serde_json::json!({"hour": 6}));
        assert_eq!(handler.describe(&action), "Set alarm: 06:00");
    }

    #[test]
    fn test_alarm_rejects_out_of_range() {
        let handler = AlarmHandler;
        for extras in [
            serde_json::json!({"hour": 24}),
            serde_json::json!({"hour": "7", "minutes": "60"}),
            serde_json::json!({"hour": "seven"}),
            serde_json::json!({"hour": 7, "minutes": "soon"}),
            serde_json::json!({}),
        ] {
            let action = alarm(extras);
            assert!(!handler.can_handle(&action));
            assert!(matches!(
                handler.launch(&action).unwrap_err(),
                ActionError::InvalidPayload(_)
            ));
        }
    }

    #[test]
    fn test_alarm_describe_invalid() {
        assert_eq!(
            AlarmHandler.describe(&alarm(serde_json::json!({}))),
            "Set alarm: <invalid time>"
        );
    }
}
