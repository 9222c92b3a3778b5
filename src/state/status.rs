//! Status line and user-facing alerts.

/// A dismissible alert shown to the user.
#[derive(Debug, Clone)]
pub struct UserAlert {
    pub id: u32,
    pub title: String,
    pub body: String,
}

/// Top-bar status message plus the alert queue.
#[derive(Debug)]
pub struct StatusState {
    pub message: String,
    pub alerts: Vec<UserAlert>,
    next_alert_id: u32,
}

impl Default for StatusState {
    fn default() -> Self {
        Self {
            message: "Ready".to_string(),
            alerts: Vec::new(),
            next_alert_id: 0,
        }
    }
}

impl StatusState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// Queues an alert window for the user.
    pub fn push_alert(&mut self, title: impl Into<String>, body: impl Into<String>) {
        let alert = UserAlert {
            id: self.next_alert_id,
            title: title.into(),
            body: body.into(),
        };
        self.next_alert_id += 1;
        log::warn!("User alert: {} - {}", alert.title, alert.body);
        self.alerts.push(alert);
    }

    pub fn dismiss_alert(&mut self, id: u32) {
        self.alerts.retain(|a| a.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_ids_unique_and_dismissable() {
        let mut status = StatusState::new();
        status.push_alert("Download failed", "network error");
        status.push_alert("Download failed", "network error");
        assert_eq!(status.alerts.len(), 2);
        assert_ne!(status.alerts[0].id, status.alerts[1].id);

        let first = status.alerts[0].id;
        status.dismiss_alert(first);
        assert_eq!(status.alerts.len(), 1);
        assert_ne!(status.alerts[0].id, first);
    }
}
