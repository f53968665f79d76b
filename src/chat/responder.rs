use rand::seq::SliceRandom;

use crate::timer::{TimerMode, TimerSnapshot, BREAK_MINUTES_MAX, BREAK_MINUTES_MIN, STUDY_MINUTES_MAX, STUDY_MINUTES_MIN};

/// Greeting seeded into every fresh transcript.
pub const GREETING: &str = "Hello! I'm your Study Assistant. I can help you \
    with timer settings, study techniques, and motivation!";

const MOTIVATION: &[&str] = &[
    "You're doing great! Every minute of focus is an investment in yourself.",
    "Progress beats perfection. One session at a time.",
    "Hard now, easy later. Keep going!",
    "Your future self will thank you for the work you put in today.",
    "Small steps every day add up to big results. Stay with it!",
];

/// A side effect requested by the responder, executed by the caller
/// against the user's timer session or notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    StartTimer,
    PauseTimer,
    ResetTimer,
    SetStudyMinutes(u32),
    SetBreakMinutes(u32),
    CreateNote { title: String, content: String },
}

/// Read-only view of the caller's state, consulted when composing replies.
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub timer: TimerSnapshot,
    pub note_count: usize,
}

/// What the assistant says, plus at most one side effect.
#[derive(Debug, Clone)]
pub struct Reply {
    pub text: String,
    pub command: Option<Command>,
}

impl Reply {
    fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            command: None,
        }
    }

    fn with_command(text: impl Into<String>, command: Command) -> Self {
        Self {
            text: text.into(),
            command: Some(command),
        }
    }
}

/// One entry in the dispatch table. Ordering in [`RULES`] is semantically
/// load-bearing: the first rule whose `matches` returns true handles the
/// message, and nothing after it is consulted.
struct Rule {
    #[allow(dead_code)]
    name: &'static str,
    matches: fn(&str) -> bool,
    respond: fn(&str, &ChatContext) -> Reply,
}

const RULES: &[Rule] = &[
    Rule {
        name: "note-creation",
        matches: |t| {
            t.starts_with("note:")
                || (t.contains("note")
                    && ["add", "create", "take", "save", "write"]
                        .iter()
                        .any(|v| t.contains(v)))
        },
        respond: note_creation,
    },
    Rule {
        name: "greeting",
        matches: |t| {
            t == "hi" || t.starts_with("hi ") || t.contains("hello") || t.contains("hey")
        },
        respond: |_, _| {
            Reply::text_only(
                "Hello! Ready to get some studying done? Say \"start\" to begin \
                 a session, or ask me for help to see what I can do.",
            )
        },
    },
    Rule {
        name: "help",
        matches: |t| t.contains("help") || t.contains("what can you do"),
        respond: |_, _| {
            Reply::text_only(
                "Here's what I can do:\n\
                 - \"start\", \"pause\", or \"reset\" to control the timer\n\
                 - \"set study time to 45 minutes\" or \"set break time to 10 minutes\"\n\
                 - \"take a note: ...\" to save a quick note\n\
                 - ask about the Pomodoro technique, your stats, or motivation",
            )
        },
    },
    Rule {
        name: "start",
        matches: |t| t.contains("start") || t.contains("begin") || t.contains("resume"),
        respond: start_timer,
    },
    Rule {
        name: "pause",
        matches: |t| t.contains("pause") || t.contains("stop"),
        respond: pause_timer,
    },
    Rule {
        name: "reset",
        matches: |t| t.contains("reset") || t.contains("restart"),
        respond: |_, ctx| {
            Reply::with_command(
                format!(
                    "Resetting the {} timer back to {} minutes.",
                    ctx.timer.mode.as_str(),
                    current_minutes(ctx)
                ),
                Command::ResetTimer,
            )
        },
    },
    Rule {
        name: "study-duration",
        matches: |t| t.contains("study") && mentions_duration(t),
        respond: study_duration,
    },
    Rule {
        name: "break-duration",
        matches: |t| t.contains("break") && mentions_duration(t),
        respond: break_duration,
    },
    Rule {
        name: "technique-info",
        matches: |t| t.contains("pomodoro") || t.contains("technique") || t.contains("method"),
        respond: |_, _| {
            Reply::text_only(
                "The Pomodoro technique: study in focused intervals (classically \
                 25 minutes), then take a short break. After a few rounds, take a \
                 longer break. The timer here does exactly that — start a session \
                 and I'll tell you when it's time to rest.",
            )
        },
    },
    Rule {
        name: "motivation",
        matches: |t| {
            t.contains("motivat")
                || t.contains("encourage")
                || t.contains("tired")
                || t.contains("give up")
        },
        respond: |_, _| {
            let line = MOTIVATION
                .choose(&mut rand::thread_rng())
                .copied()
                .unwrap_or(MOTIVATION[0]);
            Reply::text_only(line)
        },
    },
    Rule {
        name: "stats",
        matches: |t| {
            t.contains("stats")
                || t.contains("progress")
                || t.contains("how many")
                || t.contains("session")
        },
        respond: |_, ctx| {
            Reply::text_only(format!(
                "So far you've completed {} study session{} and saved {} note{}. Keep it up!",
                ctx.timer.completed_sessions,
                plural(ctx.timer.completed_sessions as usize),
                ctx.note_count,
                plural(ctx.note_count),
            ))
        },
    },
    Rule {
        name: "thanks",
        matches: |t| t.contains("thank"),
        respond: |_, _| Reply::text_only("You're welcome! Happy studying."),
    },
];

/// Produce a reply for one user message.
///
/// Matching is case-insensitive; when no rule matches, a fallback reply
/// lists the supported topics.
pub fn respond(raw_text: &str, ctx: &ChatContext) -> Reply {
    let text = raw_text.trim().to_lowercase();

    for rule in RULES {
        if (rule.matches)(&text) {
            return (rule.respond)(&text, ctx);
        }
    }

    Reply::text_only(
        "I'm not sure about that one. I can help with starting or pausing the \
         timer, study and break durations, the Pomodoro technique, motivation, \
         your stats, or taking notes — try \"help\" for examples.",
    )
}

fn note_creation(text: &str, _ctx: &ChatContext) -> Reply {
    let content = extract_note_content(text);
    if content.is_empty() {
        return Reply::text_only(
            "Sure — what should the note say? Try \"take a note: revise chapter 4\".",
        );
    }
    let title = note_title(&content);
    Reply::with_command(
        format!("Got it, I've saved that as a note titled \"{}\".", title),
        Command::CreateNote { title, content },
    )
}

fn start_timer(_text: &str, ctx: &ChatContext) -> Reply {
    if ctx.timer.is_running {
        return Reply::text_only(format!(
            "The timer is already running — {} left in your {} session.",
            format_clock(ctx.timer.time_remaining_secs),
            ctx.timer.mode.as_str()
        ));
    }
    Reply::with_command(
        format!(
            "Starting your {} timer: {} on the clock. Good luck!",
            ctx.timer.mode.as_str(),
            format_clock(ctx.timer.time_remaining_secs)
        ),
        Command::StartTimer,
    )
}

fn pause_timer(_text: &str, ctx: &ChatContext) -> Reply {
    if !ctx.timer.is_running {
        return Reply::text_only(
            "The timer isn't running right now. Say \"start\" when you're ready.",
        );
    }
    Reply::with_command(
        format!(
            "Pausing the timer with {} left. Take your time.",
            format_clock(ctx.timer.time_remaining_secs)
        ),
        Command::PauseTimer,
    )
}

fn study_duration(text: &str, ctx: &ChatContext) -> Reply {
    match extract_first_int(text) {
        Some(n) => {
            let minutes = n.clamp(STUDY_MINUTES_MIN, STUDY_MINUTES_MAX);
            Reply::with_command(
                format!("Done — study sessions are now {} minutes long.", minutes),
                Command::SetStudyMinutes(minutes),
            )
        }
        None => Reply::text_only(format!(
            "Your study sessions are currently {} minutes. Tell me a number \
             (1-180) to change it.",
            ctx.timer.study_minutes
        )),
    }
}

fn break_duration(text: &str, ctx: &ChatContext) -> Reply {
    match extract_first_int(text) {
        Some(n) => {
            let minutes = n.clamp(BREAK_MINUTES_MIN, BREAK_MINUTES_MAX);
            Reply::with_command(
                format!("Done — breaks are now {} minutes long.", minutes),
                Command::SetBreakMinutes(minutes),
            )
        }
        None => Reply::text_only(format!(
            "Your breaks are currently {} minutes. Tell me a number (1-60) \
             to change it.",
            ctx.timer.break_minutes
        )),
    }
}

fn mentions_duration(t: &str) -> bool {
    t.contains("time")
        || t.contains("duration")
        || t.contains("minute")
        || t.contains("length")
        || t.contains("set")
        || t.contains("long")
}

/// First run of digits in the text, if any. Values too large for `u32`
/// saturate; the caller clamps into range anyway.
fn extract_first_int(text: &str) -> Option<u32> {
    let mut digits = String::new();
    for c in text.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if !digits.is_empty() {
            break;
        }
    }
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(u32::MAX))
}

/// Note body: everything after the first ':' when present, otherwise
/// everything after the word "note".
fn extract_note_content(text: &str) -> String {
    if let Some(idx) = text.find(':') {
        return text[idx + 1..].trim().to_string();
    }
    if let Some(idx) = text.find("note") {
        return text[idx + 4..].trim().to_string();
    }
    String::new()
}

/// A short title derived from the first words of the content, cut to at
/// most 40 bytes on a char boundary.
fn note_title(content: &str) -> String {
    let title: Vec<&str> = content.split_whitespace().take(5).collect();
    let mut title = title.join(" ");
    if title.len() > 40 {
        let mut cut = 40;
        while !title.is_char_boundary(cut) {
            cut -= 1;
        }
        title.truncate(cut);
        return title.trim_end().to_string();
    }
    title
}

fn current_minutes(ctx: &ChatContext) -> u32 {
    match ctx.timer.mode {
        TimerMode::Study => ctx.timer.study_minutes,
        TimerMode::Break => ctx.timer.break_minutes,
    }
}

fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerEngine;

    fn ctx() -> ChatContext {
        ChatContext {
            timer: TimerEngine::new().snapshot(),
            note_count: 0,
        }
    }

    fn running_ctx() -> ChatContext {
        let mut engine = TimerEngine::new();
        engine.start();
        ChatContext {
            timer: engine.snapshot(),
            note_count: 0,
        }
    }

    #[test]
    fn start_when_idle_starts_the_timer() {
        let reply = respond("start", &ctx());
        assert!(reply.text.contains("Starting"), "got: {}", reply.text);
        assert_eq!(reply.command, Some(Command::StartTimer));
    }

    #[test]
    fn start_when_running_is_a_no_op() {
        let reply = respond("start", &running_ctx());
        assert!(reply.text.contains("already running"), "got: {}", reply.text);
        assert!(reply.command.is_none());
    }

    #[test]
    fn pause_when_running_pauses() {
        let reply = respond("pause the timer please", &running_ctx());
        assert_eq!(reply.command, Some(Command::PauseTimer));
    }

    #[test]
    fn pause_when_idle_has_no_effect() {
        let reply = respond("stop", &ctx());
        assert!(reply.command.is_none());
    }

    #[test]
    fn reset_always_resets() {
        let reply = respond("reset", &running_ctx());
        assert_eq!(reply.command, Some(Command::ResetTimer));
    }

    #[test]
    fn set_study_time_extracts_the_number() {
        let reply = respond("set study time to 40 minutes", &ctx());
        assert!(reply.text.contains("40"), "got: {}", reply.text);
        assert_eq!(reply.command, Some(Command::SetStudyMinutes(40)));
    }

    #[test]
    fn set_study_time_clamps_to_range() {
        let reply = respond("set study time to 500 minutes", &ctx());
        assert_eq!(reply.command, Some(Command::SetStudyMinutes(180)));
    }

    #[test]
    fn study_duration_without_number_reports_current() {
        let reply = respond("how long is my study time", &ctx());
        assert!(reply.text.contains("25"), "got: {}", reply.text);
        assert!(reply.command.is_none());
    }

    #[test]
    fn set_break_time_extracts_the_number() {
        let reply = respond("set my break time to 10", &ctx());
        assert!(reply.text.contains("10"), "got: {}", reply.text);
        assert_eq!(reply.command, Some(Command::SetBreakMinutes(10)));
    }

    #[test]
    fn note_creation_wins_over_later_rules() {
        // Contains "hey" (greeting) and "start" would never match here, but
        // the note rule sits first in the table and must take precedence.
        let reply = respond("hey, take a note: buy index cards", &ctx());
        assert_eq!(
            reply.command,
            Some(Command::CreateNote {
                title: "buy index cards".to_string(),
                content: "buy index cards".to_string(),
            })
        );
    }

    #[test]
    fn note_without_content_asks_for_it() {
        let reply = respond("take a note", &ctx());
        assert!(reply.command.is_none());
        assert!(reply.text.contains("what should the note say"));
    }

    #[test]
    fn stats_reports_sessions_and_notes() {
        let mut context = ctx();
        context.note_count = 3;
        let reply = respond("show me my stats", &context);
        assert!(reply.text.contains("0 study sessions"), "got: {}", reply.text);
        assert!(reply.text.contains("3 notes"), "got: {}", reply.text);
    }

    #[test]
    fn motivation_picks_a_canned_line() {
        let reply = respond("i need some motivation", &ctx());
        assert!(MOTIVATION.contains(&reply.text.as_str()));
    }

    #[test]
    fn greeting_help_technique_and_thanks_reply_without_commands() {
        for input in ["hello", "help", "what is the pomodoro technique", "thanks!"] {
            let reply = respond(input, &ctx());
            assert!(reply.command.is_none(), "input {:?} produced a command", input);
            assert!(!reply.text.is_empty());
        }
    }

    #[test]
    fn unmatched_input_gets_the_fallback() {
        let reply = respond("what's the weather like", &ctx());
        assert!(reply.text.contains("not sure"), "got: {}", reply.text);
        assert!(reply.command.is_none());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let reply = respond("START", &ctx());
        assert_eq!(reply.command, Some(Command::StartTimer));
    }

    #[test]
    fn extract_first_int_finds_the_first_run_of_digits() {
        assert_eq!(extract_first_int("set study to 40 or 50"), Some(40));
        assert_eq!(extract_first_int("no numbers here"), None);
        assert_eq!(extract_first_int("99999999999"), Some(u32::MAX));
    }

    #[test]
    fn absurdly_large_duration_still_clamps_to_range() {
        let reply = respond("set study time to 9999999 minutes", &ctx());
        assert_eq!(reply.command, Some(Command::SetStudyMinutes(180)));
        let reply = respond("set break time to 99999999999 minutes", &ctx());
        assert_eq!(reply.command, Some(Command::SetBreakMinutes(60)));
    }

    #[test]
    fn note_title_truncates_on_a_char_boundary() {
        // 14 euro signs: 42 bytes in one word, no boundary at byte 40.
        let content = "€".repeat(14);
        let reply = respond(&format!("take a note: {}", content), &ctx());
        match reply.command {
            Some(Command::CreateNote { title, content: saved }) => {
                assert_eq!(saved, content);
                assert_eq!(title, "€".repeat(13));
            }
            other => panic!("expected a note command, got {:?}", other),
        }
    }
}
