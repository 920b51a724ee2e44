//! Regression tests for intent classification order

#[cfg(test)]
mod tests {
    use device_client::Action;

    use crate::intent::{Intent, IntentClassifier, IntentRule};

    fn classify(text: &str) -> Intent {
        IntentClassifier::default().classify(text)
    }

    #[test]
    fn test_one_sentence_per_action() {
        let cases = [
            ("set an alarm for 7am", Action::SetAlarm),
            ("text John that I'm running late", Action::SendSms),
            ("play some lo-fi beats", Action::PlayMedia),
            ("send an email to my boss saying I'm sick", Action::SendEmail),
            ("what are my notifications", Action::GetNotifications),
            ("read my latest text messages", Action::ReadTextMessages),
            ("summarize my emails", Action::ReadEmailSummary),
            (
                "add a dentist appointment to my calendar for friday",
                Action::AddCalendarReminder,
            ),
            ("take a note: buy milk", Action::AddNote),
        ];

        for (text, expected) in cases {
            assert_eq!(classify(text), Intent::Action(expected), "text: {}", text);
        }
    }

    #[test]
    fn test_every_action_has_a_rule() {
        let classifier = IntentClassifier::default();
        for action in Action::ALL {
            assert!(
                classifier.rules().iter().any(|r| r.action() == action),
                "no rule for {}",
                action
            );
        }
    }

    #[test]
    fn test_more_phrasings() {
        let cases = [
            ("wake me up at 6:30 tomorrow", Action::SetAlarm),
            ("send a text to Mum saying happy birthday", Action::SendSms),
            ("email Sarah the meeting notes", Action::SendEmail),
            ("remind me to call the bank at 5pm", Action::AddCalendarReminder),
            ("do I have any new emails", Action::ReadEmailSummary),
            ("check my messages", Action::ReadTextMessages),
            ("put on my running playlist", Action::PlayMedia),
            ("jot down that the wifi password is hunter2", Action::AddNote),
            ("read my last text", Action::ReadTextMessages),
            ("read the text from mom", Action::ReadTextMessages),
            ("set a reminder for 5pm", Action::AddCalendarReminder),
        ];

        for (text, expected) in cases {
            assert_eq!(classify(text), Intent::Action(expected), "text: {}", text);
        }
    }

    #[test]
    fn test_specific_rule_beats_generic_rule() {
        // both "set an alarm" and "remind me" match; the alarm rule is listed first
        let text = "set an alarm to remind me about the meeting";
        let remind_only = IntentClassifier::new(vec![
            IntentRule::new(r"\bremind\s+me\b", Action::AddCalendarReminder).unwrap(),
        ]);
        assert_eq!(
            remind_only.classify(text),
            Intent::Action(Action::AddCalendarReminder)
        );
        assert_eq!(classify(text), Intent::Action(Action::SetAlarm));

        // email summary is more specific than the bare notifications rule
        assert_eq!(
            classify("check my email notifications"),
            Intent::Action(Action::ReadEmailSummary)
        );
    }

    #[test]
    fn test_reading_a_text_never_sends_one() {
        for text in ["read my last text", "check the text from Sam", "show me that message"] {
            assert_eq!(
                classify(text),
                Intent::Action(Action::ReadTextMessages),
                "text: {}",
                text
            );
        }
    }

    #[test]
    fn test_reminder_wraps_other_verbs() {
        let cases = [
            "remind me to play tennis at 5pm",
            "remind me to send a message to John tomorrow",
            "remind me to email Sarah the slides",
            "set a reminder to text Mum",
        ];
        for text in cases {
            assert_eq!(
                classify(text),
                Intent::Action(Action::AddCalendarReminder),
                "text: {}",
                text
            );
        }

        // the same verbs still work on their own
        assert_eq!(classify("play tennis highlights"), Intent::Action(Action::PlayMedia));
        assert_eq!(
            classify("send a message to John"),
            Intent::Action(Action::SendSms)
        );
    }

    #[test]
    fn test_explicit_note_beats_calendar_words() {
        assert_eq!(
            classify("add a note to remind me about the meeting"),
            Intent::Action(Action::AddNote)
        );
        assert_eq!(
            classify("schedule a meeting with Dana on Monday"),
            Intent::Action(Action::AddCalendarReminder)
        );
    }

    #[test]
    fn test_one_word_rules_come_last() {
        let classifier = IntentClassifier::default();
        let rules = classifier.rules();
        let play = rules.iter().position(|r| r.pattern() == r"\bplay\b").unwrap();
        let remind = rules
            .iter()
            .position(|r| r.pattern().contains(r"remind\s+me"))
            .unwrap();
        let send_sms = rules
            .iter()
            .position(|r| r.action() == Action::SendSms)
            .unwrap();
        assert!(remind < send_sms);
        assert!(send_sms < play);
    }

    #[test]
    fn test_first_listed_rule_wins() {
        let specific = IntentRule::new(r"\bsend\s+an?\s+email\b", Action::SendEmail).unwrap();
        let generic = IntentRule::new(r"\bsend\b", Action::SendSms).unwrap();
        let text = "send an email to Sam";

        let ordered = IntentClassifier::new(vec![specific.clone(), generic.clone()]);
        assert_eq!(ordered.classify(text), Intent::Action(Action::SendEmail));

        let reversed = IntentClassifier::new(vec![generic, specific]);
        assert_eq!(reversed.classify(text), Intent::Action(Action::SendSms));
    }

    #[test]
    fn test_greeting_takes_precedence() {
        assert_eq!(classify("hi"), Intent::Greeting);
        assert_eq!(classify("hi, can you play some music"), Intent::Greeting);
        assert_eq!(classify("HEY set an alarm for 7"), Intent::Greeting);
        assert_eq!(classify("  hello there"), Intent::Greeting);
        assert_eq!(classify("Good morning!"), Intent::Greeting);
        assert_eq!(classify("help"), Intent::Greeting);
        assert_eq!(classify("what can you do?"), Intent::Greeting);
    }

    #[test]
    fn test_greeting_must_be_a_leading_whole_word() {
        assert_eq!(classify("I said hi to mom"), Intent::Unclassified);
        assert_eq!(classify("this is high time"), Intent::Unclassified);
        assert_eq!(classify("history of jazz music"), Intent::Action(Action::PlayMedia));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(classify("SET AN ALARM FOR 6"), Intent::Action(Action::SetAlarm));
        assert_eq!(classify("Play Spotify"), Intent::Action(Action::PlayMedia));
    }

    #[test]
    fn test_partial_words_do_not_match() {
        assert_eq!(classify("that news was alarming"), Intent::Unclassified);
        assert_eq!(classify("stop texting me"), Intent::Unclassified);
        assert_eq!(classify("a playful puppy"), Intent::Unclassified);
    }

    #[test]
    fn test_unmatched_text_is_unclassified() {
        assert_eq!(classify("tell me a joke"), Intent::Unclassified);
        assert_eq!(classify("what's the weather like"), Intent::Unclassified);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(IntentRule::new(r"(unclosed", Action::AddNote).is_err());
    }
}
