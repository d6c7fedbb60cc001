//! Browser shell: renders engine snapshots into the page and forwards clicks,
//! typing and the one-second interval back into the engine.
//!
//! All markup is rebuilt from a snapshot after each intent. The only partial
//! update is the countdown text on ordinary ticks, so the answer box keeps
//! focus while the clock runs.

use std::cell::RefCell;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlInputElement, window};

use crate::catalog::{self, LEVEL_COUNT};
use crate::engine::summary::{self, CompletionSummary, ProgressMeter, RECENT_LIMIT};
use crate::engine::{Engine, EngineError, EngineSnapshot, Intent, Phase};
use crate::store::{LocalStorageStore, MemoryStore, ProgressStore};
use crate::timer::{TimerEvent, format_clock};

type BrowserEngine = Engine<Box<dyn ProgressStore>>;

struct App {
    doc: Document,
    engine: BrowserEngine,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

const SHELL_HTML: &str = r#"
<header class="top"><strong>SpeakEasy</strong>
  <span id="currentLevel" class="small"></span>
  <span id="user-name-display" class="small"></span>
  <span id="timerDisplay" class="small">00:00</span>
  <button class="btn ghost" data-action="reset">Reset</button>
</header>
<main id="contentArea"></main>
<aside>
  <div id="progressText" class="small"></div>
  <div id="levelsList"></div>
  <h4>Recent</h4>
  <div id="recentList"></div>
</aside>
"#;

/// Epoch milliseconds from the page clock.
fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.time_origin() + p.now())
        .unwrap_or(0.0)
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn confirm(message: &str) -> bool {
    window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

fn alert(message: &str) {
    if let Some(w) = window() {
        let _ = w.alert_with_message(message);
    }
}

fn input_value(doc: &Document, id: &str) -> String {
    doc.get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}

fn set_html(doc: &Document, id: &str, html: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_inner_html(html);
    }
}

fn set_text(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

/// Mount the quiz and start the countdown interval.
///
/// Uses the page's `#contentArea` and sidebar elements when present;
/// otherwise a minimal layout is appended to `<body>`.
#[wasm_bindgen]
pub fn start_app() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if doc.get_element_by_id("contentArea").is_none() {
        let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
        let shell = doc.create_element("div")?;
        shell.set_id("speakeasy");
        shell.set_inner_html(SHELL_HTML);
        body.append_child(&shell)?;
    }

    let store: Box<dyn ProgressStore> = match LocalStorageStore::open() {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!("{err}; progress will not survive a reload");
            Box::new(MemoryStore::new())
        }
    };
    let engine = Engine::new(store, now_ms());
    APP.with(|cell| cell.replace(Some(App { doc: doc.clone(), engine })));
    with_app(|app| app.render());

    // Clicks: every control carries a data-action attribute.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let action = evt
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("[data-action]").ok().flatten());
            if let Some(el) = action {
                on_action(&el);
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Typing: keep the engine's draft current; Enter submits.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let Some(id) = evt
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .map(|el| el.id())
            else {
                return;
            };
            if evt.key() != "Enter" {
                return;
            }
            match id.as_str() {
                "nameInput" => with_app(|app| {
                    let name = input_value(&app.doc, "nameInput");
                    app.apply(Intent::SetName(name));
                }),
                "answerInput" => with_app(|app| {
                    let answer = input_value(&app.doc, "answerInput");
                    app.apply(Intent::Submit(answer));
                }),
                _ => {}
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            let is_answer = evt
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .is_some_and(|el| el.id() == "answerInput");
            if is_answer {
                with_app(|app| {
                    let text = input_value(&app.doc, "answerInput");
                    if let Err(err) = app.engine.set_draft(text) {
                        warn!("draft ignored: {err}");
                    }
                });
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // One tick per second drives the level countdown.
    {
        let closure = Closure::wrap(Box::new(on_second) as Box<dyn FnMut()>);
        win.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            1000,
        )?;
        closure.forget();
    }
    Ok(())
}

// Borrow the app for one intent. A callback that arrives while another one
// still holds the engine is dropped instead of re-entering it.
fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| match cell.try_borrow_mut() {
        Ok(mut guard) => {
            if let Some(app) = guard.as_mut() {
                f(app);
            }
        }
        Err(_) => warn!("engine busy; event dropped"),
    });
}

fn on_second() {
    with_app(|app| match app.engine.tick(now_ms()) {
        Ok(Some(TimerEvent::Tick { remaining })) => app.render_clock(remaining),
        Ok(Some(TimerEvent::Expired)) => app.render(),
        Ok(None) => {}
        Err(err) => {
            warn!("timeout not recorded: {err}");
            app.render();
        }
    });
}

fn on_action(el: &Element) {
    let Some(action) = el.get_attribute("data-action") else {
        return;
    };
    with_app(|app| {
        let intent = match action.as_str() {
            "start" => Intent::SetName(input_value(&app.doc, "nameInput")),
            "submit" => Intent::Submit(input_value(&app.doc, "answerInput")),
            "skip" => {
                if !confirm("Skip this level? You will mark it as failed.") {
                    return;
                }
                Intent::Skip
            }
            "forfeit" => {
                if !confirm("Showing answer will mark this level completed but as forfeited. Continue?") {
                    return;
                }
                Intent::Forfeit
            }
            "continue" => Intent::Continue,
            "review" => Intent::Review,
            "back" => Intent::Back,
            "reset" => {
                if !confirm("Are you sure? This will clear progress.") {
                    return;
                }
                Intent::Reset
            }
            "goto" => match el.get_attribute("data-level").and_then(|l| l.parse().ok()) {
                Some(level) => Intent::NavigateTo(level),
                None => return,
            },
            other => {
                warn!("unknown action {other}");
                return;
            }
        };
        if matches!(intent, Intent::Submit(_) | Intent::Skip | Intent::Forfeit) {
            let draft = input_value(&app.doc, "answerInput");
            if let Err(err) = app.engine.set_draft(draft) {
                warn!("draft ignored: {err}");
            }
        }
        app.apply(intent);
    });
}

impl App {
    fn apply(&mut self, intent: Intent) {
        let forfeit = intent == Intent::Forfeit;
        debug!("intent: {}", intent.name());
        match self.engine.dispatch(intent, now_ms()) {
            Ok(()) => {
                if forfeit {
                    if let Some(answer) = self.engine.feedback().and_then(|f| f.revealed_answer) {
                        alert(&format!("Answer: {answer}"));
                    }
                }
            }
            Err(EngineError::Locked { .. }) => {
                alert("This level is locked. Complete previous levels to unlock.");
            }
            Err(err) => alert(&err.to_string()),
        }
        self.render();
    }

    fn render_clock(&self, remaining: u32) {
        let clock = format_clock(remaining);
        set_text(&self.doc, "timerDisplay", &clock);
        set_text(&self.doc, "levelTimer", &clock);
    }

    fn render(&self) {
        let snap = self.engine.snapshot();
        let content = match snap.phase {
            Phase::AwaitingName => name_view(),
            Phase::InLevel(level) => level_view(&snap, level),
            Phase::Feedback(_) => feedback_view(&snap),
            Phase::Completed => completed_view(&snap),
            Phase::Reviewing => review_view(&snap),
        };
        set_html(&self.doc, "contentArea", &content);
        self.render_sidebar(&snap);
        self.render_clock(snap.timer.remaining_seconds);

        if let Phase::InLevel(_) = snap.phase {
            if let Some(input) = self
                .doc
                .get_element_by_id("answerInput")
                .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            {
                input.set_value(snap.draft);
                let _ = input.focus();
            }
        }
    }

    fn render_sidebar(&self, snap: &EngineSnapshot<'_>) {
        let progress = snap.progress;
        match &progress.player_name {
            Some(name) => set_text(&self.doc, "user-name-display", &format!("Hi, {name}")),
            None => set_text(&self.doc, "user-name-display", ""),
        }
        let cursor = if progress.is_complete() {
            "—".to_owned()
        } else {
            format!("Level {}", progress.current_level)
        };
        set_text(&self.doc, "currentLevel", &cursor);

        let meter = ProgressMeter::from_progress(progress);
        set_text(
            &self.doc,
            "progressText",
            &format!("{} / {} completed • {}%", meter.completed, meter.total, meter.percent),
        );

        let mut cards = String::new();
        for (level, prompt) in catalog::iter() {
            let locked = if progress.is_unlocked(level) { "" } else { " locked" };
            cards.push_str(&format!(
                r#"<div class="level-card{locked}" data-action="goto" data-level="{level}"><strong>L {level}</strong><div class="small">{}</div></div>"#,
                prompt.tier
            ));
        }
        set_html(&self.doc, "levelsList", &cards);

        let recent = summary::recent_activity(progress, RECENT_LIMIT);
        let rows = if recent.is_empty() {
            r#"<div class="small">No recent activity yet.</div>"#.to_owned()
        } else {
            recent
                .iter()
                .map(|r| {
                    let class = if r.is_correct { "success" } else { "fail" };
                    format!(
                        r#"<div class="row"><div><strong>Level {}</strong><div class="small">{}</div></div><div><div class="{class}">{}</div><div class="small">{}s</div></div></div>"#,
                        r.level_number,
                        escape_html(if r.answer_given.is_empty() { "—" } else { r.answer_given.as_str() }),
                        r.verdict(),
                        r.time_taken_seconds
                    )
                })
                .collect()
        };
        set_html(&self.doc, "recentList", &rows);
    }
}

fn name_view() -> String {
    format!(
        r#"<div class="center">
  <h2>Welcome to SpeakEasy</h2>
  <p class="small">Enter your name to start the {LEVEL_COUNT}-level challenge.</p>
  <input id="nameInput" class="input" placeholder="Enter your name" />
  <button class="btn" data-action="start">Start</button>
  <p class="hint">Your progress will be saved locally in this browser.</p>
</div>"#
    )
}

fn level_view(snap: &EngineSnapshot<'_>, level: u32) -> String {
    let Some(prompt) = snap.prompt() else {
        return String::new();
    };
    let name = snap.progress.player_name.as_deref().unwrap_or_default();
    format!(
        r#"<div>
  <div class="small">Level {level} — {tier}</div>
  <div class="title">Translate to English</div>
  <div class="small">Name: <strong>{name}</strong></div>
  <div class="panel">
    <div class="question">{question}</div>
    <input id="answerInput" class="answer-input" placeholder="Type your English translation here..." autocomplete="off" />
    <button class="btn" data-action="submit">Submit</button>
    <button class="btn ghost" data-action="skip">Skip</button>
    <button class="btn ghost" data-action="forfeit">Show Answer (forfeit)</button>
    <span class="small">Timer: <span id="levelTimer">{clock}</span></span>
    <p class="hint">Type the exact answer or a close match (case-insensitive).</p>
  </div>
</div>"#,
        tier = prompt.tier.label().to_uppercase(),
        name = escape_html(name),
        question = escape_html(prompt.prompt_text),
        clock = format_clock(snap.timer.remaining_seconds),
    )
}

fn feedback_view(snap: &EngineSnapshot<'_>) -> String {
    let Some(fb) = snap.feedback else {
        return String::new();
    };
    let verdict = if fb.record.is_correct {
        r#"<span class="success">Correct</span>"#
    } else {
        r#"<span class="fail">Not correct / Forfeited</span>"#
    };
    let revealed = fb
        .revealed_answer
        .map(|a| format!(r#"<div class="hint">Answer: {}</div>"#, escape_html(a)))
        .unwrap_or_default();
    let given = if fb.record.answer_given.is_empty() { "—" } else { fb.record.answer_given.as_str() };
    format!(
        r#"<div class="center">
  <div class="title">Level {level} Completed</div>
  <div class="meta">Time taken: <strong>{secs}s</strong></div>
  <div>Result: {verdict}</div>
  {revealed}
  <div class="hint">Your answer: "{given}" • similarity: {score}</div>
  <button class="btn" data-action="continue">Continue</button>
</div>"#,
        level = fb.level,
        secs = fb.record.time_taken_seconds,
        given = escape_html(given),
        score = fb.record.similarity_score,
    )
}

fn completed_view(snap: &EngineSnapshot<'_>) -> String {
    let s = CompletionSummary::from_progress(snap.progress);
    format!(
        r#"<div class="center">
  <div class="winner">Congratulations, {name}!</div>
  <div class="title">You completed all {count} levels</div>
  <div class="meta">Total time: <strong>{total}s</strong> • Average per level: <strong>{avg:.1}s</strong></div>
  <div class="small">Correct answers: <strong>{correct}</strong> / {count}</div>
  <button class="btn" data-action="review">Review All Answers</button>
  <button class="btn ghost" data-action="reset">Restart (Reset progress)</button>
</div>"#,
        name = escape_html(&s.player_name),
        count = s.level_count,
        total = s.total_time_seconds,
        avg = s.average_seconds,
        correct = s.correct_count,
    )
}

fn review_view(snap: &EngineSnapshot<'_>) -> String {
    let mut html = String::from(r#"<div><h3>Review — All Levels</h3><div class="list">"#);
    for row in summary::review_rows(snap.progress) {
        let (class, verdict, secs) = match row.attempt {
            Some(r) if r.is_correct => ("success", "Correct", format!("{}s", r.time_taken_seconds)),
            Some(r) => ("fail", "Not/Forfeit", format!("{}s", r.time_taken_seconds)),
            None => ("fail", "Not/Forfeit", "--".to_owned()),
        };
        let given = row
            .attempt
            .map(|r| r.answer_given.as_str())
            .filter(|a| !a.is_empty())
            .unwrap_or("—");
        html.push_str(&format!(
            r#"<div class="row"><div>
  <strong>Level {level} • {tier}</strong>
  <div class="small">Q: {q}</div>
  <div class="small">Correct: {a}</div>
  <div class="small">Your answer: {given}</div>
</div><div><div class="{class}">{verdict}</div><div class="small">{secs}</div></div></div>"#,
            level = row.level,
            tier = row.prompt.tier,
            q = escape_html(row.prompt.prompt_text),
            a = escape_html(row.prompt.expected_answer),
            given = escape_html(given),
        ));
    }
    html.push_str(r#"</div><button class="btn" data-action="back">Back</button></div>"#);
    html
}
