use std::collections::VecDeque;
use std::io;
use talkpipe_core::{AudioChunk, EngineError, ProtocolWriter};
use talkpipe_engine::{Decoding, NullRecognizer, Recognizer, SpottingError, SpottingSession};

/// One scripted decoder step: what the recognizer reports for one chunk.
#[derive(Clone)]
enum Step {
    Partial(&'static str),
    Final(&'static str),
}

/// A recognizer that replays a fixed script. After a `reset()` it returns
/// empty text until the next finalized step, the way a real decoder loses
/// the half-decoded utterance when its state is dropped.
struct ScriptedRecognizer {
    script: VecDeque<Step>,
    current: Step,
    suppressed: bool,
    reset_count: usize,
}

impl ScriptedRecognizer {
    fn new(script: Vec<Step>) -> Self {
        Self {
            script: script.into(),
            current: Step::Partial(""),
            suppressed: false,
            reset_count: 0,
        }
    }
}

impl Recognizer for ScriptedRecognizer {
    fn name(&self) -> &str {
        "scripted"
    }

    fn feed(&mut self, _chunk: &AudioChunk) -> Result<Decoding, EngineError> {
        self.current = self.script.pop_front().expect("script exhausted");
        match self.current {
            Step::Partial(_) => Ok(Decoding::Running),
            Step::Final(_) => Ok(Decoding::Finalized),
        }
    }

    fn final_result(&mut self) -> String {
        let text = match self.current {
            Step::Final(text) if !self.suppressed => text,
            _ => "",
        };
        // A final result closes the utterance; the next one starts clean.
        self.suppressed = false;
        text.to_string()
    }

    fn partial_result(&mut self) -> String {
        match self.current {
            Step::Partial(text) if !self.suppressed => text.to_string(),
            _ => String::new(),
        }
    }

    fn reset(&mut self) {
        self.reset_count += 1;
        self.suppressed = true;
    }
}

fn frames(n: usize) -> impl Iterator<Item = io::Result<AudioChunk>> {
    (0..n).map(|_| Ok(AudioChunk::new(vec![0u8; 4000])))
}

fn run(keyword: &str, script: Vec<Step>) -> (Vec<String>, ScriptedRecognizer) {
    let chunk_count = script.len();
    let mut recognizer = ScriptedRecognizer::new(script);
    let mut session = SpottingSession::new(keyword).unwrap();
    let mut out = ProtocolWriter::new(Vec::new());
    session
        .run(frames(chunk_count), &mut recognizer, &mut out)
        .unwrap();
    let lines = String::from_utf8(out.into_inner())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    (lines, recognizer)
}

#[test]
fn test_detected_on_final_result() {
    let (lines, rec) = run(
        "computer",
        vec![
            Step::Partial(""),
            Step::Partial("hey"),
            Step::Final("hey computer play music"),
        ],
    );
    assert_eq!(lines, vec!["DETECTED"]);
    assert_eq!(rec.reset_count, 0);
}

#[test]
fn test_detection_is_case_insensitive() {
    let (lines, _) = run("computer", vec![Step::Final("Hey COMPUTER")]);
    assert_eq!(lines, vec!["DETECTED"]);
}

#[test]
fn test_detected_on_partial_resets_decoder() {
    // Without the reset, the second and third steps would still contain
    // the keyword and fire again.
    let (lines, rec) = run(
        "computer",
        vec![
            Step::Partial("hey computer"),
            Step::Partial("hey computer please"),
            Step::Final("hey computer please stop"),
        ],
    );
    assert_eq!(lines, vec!["DETECTED"]);
    assert_eq!(rec.reset_count, 1);
}

#[test]
fn test_post_reset_audio_is_a_new_utterance() {
    let (lines, rec) = run(
        "computer",
        vec![
            Step::Partial("computer"),      // detect + reset
            Step::Final("lost tail"),       // suppressed by the reset
            Step::Partial("computer again"), // new utterance, detects again
        ],
    );
    assert_eq!(lines, vec!["DETECTED", "DETECTED"]);
    assert_eq!(rec.reset_count, 2);
}

#[test]
fn test_no_detection_without_keyword() {
    let (lines, rec) = run(
        "computer",
        vec![
            Step::Partial("hey there"),
            Step::Partial("hey there friend"),
            Step::Final("hey there friend how are you"),
        ],
    );
    assert!(lines.is_empty());
    assert_eq!(rec.reset_count, 0);
}

#[test]
fn test_multiple_occurrences_emit_one_line() {
    let (lines, _) = run("computer", vec![Step::Final("computer computer computer")]);
    assert_eq!(lines, vec!["DETECTED"]);
}

#[test]
fn test_empty_results_never_fire() {
    let (lines, _) = run(
        "computer",
        vec![Step::Partial(""), Step::Partial(""), Step::Final("")],
    );
    assert!(lines.is_empty());
}

#[test]
fn test_frames_consumed_counts_every_chunk() {
    let mut recognizer = NullRecognizer::new();
    let mut session = SpottingSession::new("computer").unwrap();
    let mut out = ProtocolWriter::new(Vec::new());
    session.run(frames(7), &mut recognizer, &mut out).unwrap();
    assert_eq!(session.frames_consumed(), 7);
    assert_eq!(recognizer.feed_count(), 7);
    assert!(out.into_inner().is_empty());
}

#[test]
fn test_input_error_emits_error_line_and_aborts() {
    let input = vec![
        Ok(AudioChunk::new(vec![0u8; 4000])),
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe broke")),
    ];
    let mut recognizer = NullRecognizer::new();
    let mut session = SpottingSession::new("computer").unwrap();
    let mut out = ProtocolWriter::new(Vec::new());

    let result = session.run(input.into_iter(), &mut recognizer, &mut out);
    assert!(matches!(result, Err(SpottingError::Input(_))));
    assert_eq!(session.frames_consumed(), 1);

    let output = String::from_utf8(out.into_inner()).unwrap();
    assert!(output.starts_with("ERROR: audio input failed"));
}
