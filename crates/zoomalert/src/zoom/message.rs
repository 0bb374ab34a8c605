//! Zoom chat message schema
//!
//! The rich-content payload posted to `/v2/im/chat/messages`: a head line
//! with optional styling and sub-head, a heterogeneous list of body blocks
//! (text, key/value fields, action buttons), and an optional footer.

use serde::{Deserialize, Serialize};

/// Outbound chat message envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub robot_jid: String,
    pub to_jid: String,
    pub account_id: String,
    pub content: MessageContent,
}

/// Rich message content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageContent {
    pub head: Head,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<BodyBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Footer>,
}

/// Message headline with optional styling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Head {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_head: Option<SubHead>,
}

/// Text styling for the headline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Style {
    pub color: String,
    pub bold: bool,
}

/// Secondary headline text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubHead {
    pub text: String,
}

/// Footer line rendered below the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Footer {
    pub text: String,
}

/// One block of the message body.
///
/// Blocks are tagged by a `type` discriminator on the wire, matching the
/// Zoom chatbot content schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BodyBlock {
    /// Plain paragraph text
    Message { text: String },
    /// Key/value detail rows
    Fields { items: Vec<Field> },
    /// Action buttons
    Actions { items: Vec<Action> },
}

/// A key/value row inside a fields block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    pub value: String,
}

/// A button inside an actions block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub text: String,
    pub value: String,
    pub style: String,
}

/// Alert severity, mapped to headline colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Info,
    Warning,
    Error,
    Critical,
}

impl AlertLevel {
    /// Headline color associated with this severity.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Info => "#2D8CFF",
            Self::Warning => "#F1A617",
            Self::Error => "#E8173D",
            Self::Critical => "#99001A",
        }
    }

    /// Uppercase label used as the sub-head.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl MessageContent {
    /// Headline-only content for plain text alerts.
    #[must_use]
    pub fn text(message: impl Into<String>) -> Self {
        Self { head: Head { text: message.into(), style: None, sub_head: None }, ..Self::default() }
    }

    /// Severity-templated alert content.
    ///
    /// The heading is colored and (for error/critical) bolded, the severity
    /// label becomes the sub-head, and the body text lands in a message
    /// block. A closeable alert gains a dismiss button.
    #[must_use]
    pub fn alert(
        heading: impl Into<String>,
        body: impl Into<String>,
        level: AlertLevel,
        closeable: bool,
    ) -> Self {
        let mut blocks = vec![BodyBlock::Message { text: body.into() }];
        if closeable {
            blocks.push(BodyBlock::Actions {
                items: vec![Action {
                    text: "Dismiss".to_string(),
                    value: "dismiss".to_string(),
                    style: "Default".to_string(),
                }],
            });
        }

        Self {
            head: Head {
                text: heading.into(),
                style: Some(Style {
                    color: level.color().to_string(),
                    bold: matches!(level, AlertLevel::Error | AlertLevel::Critical),
                }),
                sub_head: Some(SubHead { text: level.label().to_string() }),
            },
            body: blocks,
            footer: None,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for zoom::message.
    use super::*;

    /// Validates body-block serialization for the wire discriminators.
    ///
    /// Assertions:
    /// - Confirms blocks tag as `message`, `fields`, and `actions`.
    #[test]
    fn test_body_block_tags() {
        let message = serde_json::to_value(BodyBlock::Message { text: "hi".to_string() }).unwrap();
        assert_eq!(message["type"], "message");

        let fields = serde_json::to_value(BodyBlock::Fields {
            items: vec![Field { key: "host".to_string(), value: "web-1".to_string() }],
        })
        .unwrap();
        assert_eq!(fields["type"], "fields");
        assert_eq!(fields["items"][0]["key"], "host");

        let actions = serde_json::to_value(BodyBlock::Actions {
            items: vec![Action {
                text: "Ack".to_string(),
                value: "ack".to_string(),
                style: "Primary".to_string(),
            }],
        })
        .unwrap();
        assert_eq!(actions["type"], "actions");
    }

    /// Validates `MessageContent::alert` behavior for the template scenario.
    ///
    /// Assertions:
    /// - Confirms the head carries the severity color and label.
    /// - Ensures error-level alerts render bold.
    /// - Ensures a closeable alert carries a dismiss action block.
    #[test]
    fn test_alert_template() {
        let content = MessageContent::alert("Disk almost full", "92% used on /var", AlertLevel::Error, true);

        let style = content.head.style.as_ref().expect("styled head");
        assert_eq!(style.color, AlertLevel::Error.color());
        assert!(style.bold);
        assert_eq!(content.head.sub_head.as_ref().map(|s| s.text.as_str()), Some("ERROR"));

        assert_eq!(content.body.len(), 2);
        assert!(matches!(&content.body[0], BodyBlock::Message { text } if text.contains("92%")));
        assert!(matches!(&content.body[1], BodyBlock::Actions { .. }));
    }

    /// Validates `MessageContent::alert` behavior for non-closeable info
    /// alerts.
    ///
    /// Assertions:
    /// - Ensures no action block is attached.
    /// - Ensures the info style is not bold.
    #[test]
    fn test_info_alert_not_bold_not_closeable() {
        let content =
            MessageContent::alert("Maintenance window", "Tonight 02:00-04:00", AlertLevel::Info, false);

        assert_eq!(content.body.len(), 1);
        let style = content.head.style.as_ref().expect("styled head");
        assert!(!style.bold);
    }

    /// Validates `ChatMessage` envelope serialization.
    ///
    /// Assertions:
    /// - Confirms the routing fields appear under their wire names.
    #[test]
    fn test_chat_message_envelope() {
        let message = ChatMessage {
            robot_jid: "robot@xmpp.zoom.us".to_string(),
            to_jid: "user@xmpp.zoom.us".to_string(),
            account_id: "acct_1".to_string(),
            content: MessageContent::text("hello"),
        };

        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["robot_jid"], "robot@xmpp.zoom.us");
        assert_eq!(value["to_jid"], "user@xmpp.zoom.us");
        assert_eq!(value["account_id"], "acct_1");
        assert_eq!(value["content"]["head"]["text"], "hello");
    }
}
