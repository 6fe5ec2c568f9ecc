//! Per-message token resolution and text rendering.

use missive_types::{Account, ArgumentMap, Message, MessageTemplate};

use crate::tokens::{scan_tokens, template_tokens};

/// Compute the full argument map for a message against a template revision.
///
/// Every token in the template resolves to a replacement string:
///
/// - `[message:id]`, `[message:template]`, `[message:created]` (RFC 3339)
///   come from the message itself;
/// - `[message:author:id]`, `[message:author:name]`,
///   `[message:author:mail]` come from the owner account;
/// - anything else keeps its own raw text, so rendering degrades to showing
///   the placeholder. Author tokens degrade the same way when the owner
///   account cannot be resolved.
///
/// Map order follows first appearance in the template text.
pub fn compute_arguments(template: &MessageTemplate, message: &Message, owner: Option<&Account>) -> ArgumentMap {
    let mut arguments = ArgumentMap::new();
    for raw in template_tokens(template) {
        let value = resolve_token(&raw, message, owner);
        arguments.insert(raw, value);
    }
    arguments
}

fn resolve_token(raw: &str, message: &Message, owner: Option<&Account>) -> String {
    let Some(token) = scan_tokens(raw).into_iter().next() else {
        return raw.to_string();
    };
    if token.group != "message" {
        return raw.to_string();
    }

    match token.path.as_str() {
        "id" => message.id.to_string(),
        "template" => message.template.to_string(),
        "created" => message.created.to_rfc3339(),
        "author:id" => match owner {
            Some(account) => account.id.to_string(),
            None => raw.to_string(),
        },
        "author:name" => match owner {
            Some(account) => account.name.clone(),
            None => raw.to_string(),
        },
        "author:mail" => match owner {
            Some(account) => account.mail.clone(),
            None => raw.to_string(),
        },
        _ => raw.to_string(),
    }
}

/// Substitute a message's cached arguments into the template's text rows.
pub fn render_text(template: &MessageTemplate, arguments: &ArgumentMap) -> Vec<String> {
    template
        .text
        .iter()
        .map(|row| {
            let mut rendered = row.clone();
            for (token, value) in arguments {
                rendered = rendered.replace(token.as_str(), value);
            }
            rendered
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use missive_types::{AccountId, MessageId, TemplateId};

    fn sample_message() -> Message {
        Message {
            id: MessageId(3),
            template: TemplateId::new("dummy_message"),
            owner: AccountId(1),
            created: Utc.with_ymd_and_hms(2026, 2, 14, 9, 30, 0).single().expect("valid timestamp"),
            arguments: ArgumentMap::new(),
        }
    }

    fn sample_template() -> MessageTemplate {
        MessageTemplate::new(
            "dummy_message",
            "Dummy test",
            vec!["[message:author:name] <[message:author:mail]> created message [message:id].".to_string()],
        )
    }

    #[test]
    fn resolves_message_and_author_tokens() {
        let account = Account::new(AccountId(1), "maya", "maya@example.com");
        let arguments = compute_arguments(&sample_template(), &sample_message(), Some(&account));

        assert_eq!(arguments.get("[message:author:name]").map(String::as_str), Some("maya"));
        assert_eq!(arguments.get("[message:author:mail]").map(String::as_str), Some("maya@example.com"));
        assert_eq!(arguments.get("[message:id]").map(String::as_str), Some("3"));
    }

    #[test]
    fn missing_owner_keeps_author_tokens_raw() {
        let arguments = compute_arguments(&sample_template(), &sample_message(), None);
        assert_eq!(
            arguments.get("[message:author:name]").map(String::as_str),
            Some("[message:author:name]")
        );
    }

    #[test]
    fn unknown_tokens_keep_raw_text() {
        let template = sample_template().with_text(vec!["[site:name] says [message:color].".to_string()]);
        let arguments = compute_arguments(&template, &sample_message(), None);
        assert_eq!(arguments.get("[site:name]").map(String::as_str), Some("[site:name]"));
        assert_eq!(arguments.get("[message:color]").map(String::as_str), Some("[message:color]"));
    }

    #[test]
    fn created_token_is_rfc3339() {
        let template = sample_template().with_text(vec!["[message:created]".to_string()]);
        let arguments = compute_arguments(&template, &sample_message(), None);
        assert_eq!(
            arguments.get("[message:created]").map(String::as_str),
            Some("2026-02-14T09:30:00+00:00")
        );
    }

    #[test]
    fn render_substitutes_cached_arguments() {
        let account = Account::new(AccountId(1), "maya", "maya@example.com");
        let template = sample_template();
        let arguments = compute_arguments(&template, &sample_message(), Some(&account));

        let rendered = render_text(&template, &arguments);
        assert_eq!(rendered, vec!["maya <maya@example.com> created message 3.".to_string()]);
    }
}
