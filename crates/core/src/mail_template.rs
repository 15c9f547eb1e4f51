//! Outgoing mail templates.
//!
//! Templates are keyed by name and language. A language without its own
//! text falls back to English. Placeholders are written `{NAME}`; a
//! placeholder without a supplied value is left in place.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::digest::NoteType;

/// Language every template exists in.
pub const FALLBACK_LANGUAGE: &str = "english";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Z][A-Z0-9_]*)\}").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTemplate {
    NewAnnouncement,
    NotifyReply,
    NotifyTopic,
    NotifyLock,
    NotifyUnlock,
    NotifySticky,
    NotifyRemove,
    Digest,
    ApprovalNotification,
}

impl MailTemplate {
    pub fn name(self) -> &'static str {
        match self {
            MailTemplate::NewAnnouncement => "new_announcement",
            MailTemplate::NotifyReply => "notification_reply",
            MailTemplate::NotifyTopic => "notification_topic",
            MailTemplate::NotifyLock => "notification_lock",
            MailTemplate::NotifyUnlock => "notification_unlock",
            MailTemplate::NotifySticky => "notification_sticky",
            MailTemplate::NotifyRemove => "notification_remove",
            MailTemplate::Digest => "digest",
            MailTemplate::ApprovalNotification => "approval_notification",
        }
    }

    /// The instant-notification template for a topic event.
    pub fn for_note(note: NoteType) -> Self {
        match note {
            NoteType::Reply => MailTemplate::NotifyReply,
            NoteType::Topic => MailTemplate::NotifyTopic,
            NoteType::Lock => MailTemplate::NotifyLock,
            NoteType::Unlock => MailTemplate::NotifyUnlock,
            NoteType::Sticky => MailTemplate::NotifySticky,
            NoteType::Remove => MailTemplate::NotifyRemove,
        }
    }

    fn text(self, language: &str) -> Option<(&'static str, &'static str)> {
        match language {
            "english" => Some(english(self)),
            "spanish" => spanish(self),
            _ => None,
        }
    }
}

/// A template with its placeholders filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMail {
    pub subject: String,
    pub body: String,
}

/// Render `template` in `language`, substituting `{KEY}` from `vars`.
pub fn render(template: MailTemplate, language: &str, vars: &[(&str, &str)]) -> RenderedMail {
    let (subject, body) = template
        .text(language)
        .unwrap_or_else(|| english(template));
    RenderedMail {
        subject: substitute(subject, vars),
        body: substitute(body, vars),
    }
}

/// Replace `{KEY}` placeholders with values from `vars`.
pub fn substitute(text: &str, vars: &[(&str, &str)]) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures| {
            let key = &caps[1];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

// ---------------------------------------------------------------------------
// Texts
// ---------------------------------------------------------------------------

fn english(template: MailTemplate) -> (&'static str, &'static str) {
    match template {
        MailTemplate::NewAnnouncement => (
            "New announcement: {TOPICSUBJECT}",
            "{MESSAGE}\n\nTo unsubscribe from these announcements, log in to the forum and \
             uncheck \"Receive forum announcements and important notifications\" in your \
             profile.\n\nYou can view the full announcement by following this link:\n\
             {TOPICLINK}\n\nRegards,\nThe {FORUMNAME} Team.",
        ),
        MailTemplate::NotifyReply => (
            "Topic reply: {TOPICSUBJECT}",
            "A reply has been posted to a topic you are watching by {POSTERNAME}.\n\n\
             View the reply at: {TOPICLINK}\n\nUnsubscribe to this topic by using this \
             link: {UNSUBSCRIBELINK}\n\nRegards,\nThe {FORUMNAME} Team.",
        ),
        MailTemplate::NotifyTopic => (
            "New topic: {TOPICSUBJECT}",
            "A new topic, '{TOPICSUBJECT}', has been started on a board you are watching.\n\n\
             You can see it at\n{TOPICLINK}\n\nUnsubscribe to new topics from this board by \
             using this link: {UNSUBSCRIBELINK}\n\nRegards,\nThe {FORUMNAME} Team.",
        ),
        MailTemplate::NotifyLock => (
            "Topic locked: {TOPICSUBJECT}",
            "A topic you are watching has been locked by {POSTERNAME}.\n\n\
             View the topic at: {TOPICLINK}\n\nUnsubscribe to this topic by using this \
             link: {UNSUBSCRIBELINK}\n\nRegards,\nThe {FORUMNAME} Team.",
        ),
        MailTemplate::NotifyUnlock => (
            "Topic unlocked: {TOPICSUBJECT}",
            "A topic you are watching has been unlocked by {POSTERNAME}.\n\n\
             View the topic at: {TOPICLINK}\n\nUnsubscribe to this topic by using this \
             link: {UNSUBSCRIBELINK}\n\nRegards,\nThe {FORUMNAME} Team.",
        ),
        MailTemplate::NotifySticky => (
            "Topic stickied: {TOPICSUBJECT}",
            "A topic you are watching has been marked as a sticky topic by {POSTERNAME}.\n\n\
             View the topic at: {TOPICLINK}\n\nUnsubscribe to this topic by using this \
             link: {UNSUBSCRIBELINK}\n\nRegards,\nThe {FORUMNAME} Team.",
        ),
        MailTemplate::NotifyRemove => (
            "Topic removed: {TOPICSUBJECT}",
            "A topic you are watching has been removed by {POSTERNAME}.\n\n\
             Regards,\nThe {FORUMNAME} Team.",
        ),
        MailTemplate::Digest => (
            "{PERIOD} digest: {FORUMNAME}",
            "Dear {MEMBERNAME},\n\nThis is a summary of activity on topics and boards you \
             are watching at {FORUMNAME}.\n\n{DIGEST}\n\nRegards,\nThe {FORUMNAME} Team.",
        ),
        MailTemplate::ApprovalNotification => (
            "Items awaiting approval at {FORUMNAME}",
            "Dear {MEMBERNAME},\n\nThe following items are awaiting approval:\n\n\
             {SUMMARY}\n\nReview them at:\n{APPROVALLINK}\n\nRegards,\nThe {FORUMNAME} Team.",
        ),
    }
}

fn spanish(template: MailTemplate) -> Option<(&'static str, &'static str)> {
    let text = match template {
        MailTemplate::NewAnnouncement => (
            "Nuevo anuncio: {TOPICSUBJECT}",
            "{MESSAGE}\n\nPara dejar de recibir anuncios, identificate en el foro y desmarca \
             \"Recibir anuncios del foro y notificaciones importantes\" en tu perfil.\n\n\
             Puedes ver el anuncio completo en este enlace:\n{TOPICLINK}\n\n\
             Saludos,\nEl equipo de {FORUMNAME}.",
        ),
        MailTemplate::NotifyLock => (
            "Tema bloqueado: {TOPICSUBJECT}",
            "{POSTERNAME} ha bloqueado un tema que estas siguiendo.\n\n\
             Ver el tema: {TOPICLINK}\n\nSaludos,\nEl equipo de {FORUMNAME}.",
        ),
        MailTemplate::NotifyUnlock => (
            "Tema desbloqueado: {TOPICSUBJECT}",
            "{POSTERNAME} ha desbloqueado un tema que estas siguiendo.\n\n\
             Ver el tema: {TOPICLINK}\n\nSaludos,\nEl equipo de {FORUMNAME}.",
        ),
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_placeholders() {
        let mail = render(
            MailTemplate::NotifyLock,
            "english",
            &[
                ("TOPICSUBJECT", "Rules"),
                ("POSTERNAME", "mod"),
                ("TOPICLINK", "http://f/?topic=1.0"),
                ("FORUMNAME", "Agora"),
            ],
        );
        assert_eq!(mail.subject, "Topic locked: Rules");
        assert!(mail.body.contains("locked by mod"));
        assert!(mail.body.contains("http://f/?topic=1.0"));
    }

    #[test]
    fn unknown_placeholders_are_left_alone() {
        assert_eq!(substitute("{A} {B} {lower}", &[("A", "1")]), "1 {B} {lower}");
    }

    #[test]
    fn missing_translation_falls_back_to_english() {
        let spanish = render(MailTemplate::NotifyRemove, "spanish", &[]);
        let english = render(MailTemplate::NotifyRemove, "english", &[]);
        assert_eq!(spanish, english);

        let unknown = render(MailTemplate::Digest, "klingon", &[]);
        assert!(unknown.body.starts_with("Dear"));
    }

    #[test]
    fn translated_template_is_used() {
        let mail = render(
            MailTemplate::NewAnnouncement,
            "spanish",
            &[("TOPICSUBJECT", "Hola")],
        );
        assert_eq!(mail.subject, "Nuevo anuncio: Hola");
    }

    #[test]
    fn note_templates() {
        assert_eq!(MailTemplate::for_note(NoteType::Sticky).name(), "notification_sticky");
        assert_eq!(MailTemplate::for_note(NoteType::Remove).name(), "notification_remove");
    }
}
