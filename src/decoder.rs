use std::collections::VecDeque;

use crate::error::FingerspellError;

/// Tunables for collapsing the per-frame letter stream into text.
///
/// The defaults come from tuning against ~30fps capture: a letter has to be
/// held for 6 frames to count, 20 frames of dwell insert a word boundary, and
/// a single misclassified frame sandwiched between matching frames is bridged
/// into the surrounding run.
#[derive(Clone, Debug)]
pub struct DecoderConfig {
    /// Minimum consecutive-frame count for a run to be accepted as a letter.
    pub min_run_length: usize,
    /// Run length at which a word-separator space follows the letter.
    pub space_threshold: usize,
    /// Frames on each side of a token used to bridge an isolated mismatch.
    pub error_context: usize,
    /// Letters whose gesture dwell is naturally short; they are accepted at
    /// half the minimum run length. Domain data, not an algorithmic rule —
    /// revisit when the alphabet's timing profile changes.
    pub fast_letters: Vec<String>,
    /// Letter labels spanning more than one character, e.g. the digraph "Ch".
    pub multi_char_tokens: Vec<String>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            min_run_length: 6,
            space_threshold: 20,
            error_context: 1,
            fast_letters: vec!["G".to_string(), "F".to_string()],
            multi_char_tokens: vec!["Ch".to_string()],
        }
    }
}

/// Collapses a noisy per-frame letter stream into stabilized text.
///
/// Pure and deterministic: the same configuration and input produce
/// byte-identical output. One decode pass owns all of its run state; nothing
/// is retained across calls. For live streams use [`StreamingDecoder`].
pub struct LetterStreamDecoder {
    config: DecoderConfig,
    relaxed_run_length: usize,
    fast_lowered: Vec<String>,
    multi_by_length: Vec<String>,
}

impl LetterStreamDecoder {
    pub fn new(config: DecoderConfig) -> Result<Self, FingerspellError> {
        if config.min_run_length == 0 {
            return Err(FingerspellError::InvalidConfig(
                "min_run_length must be at least 1".to_string(),
            ));
        }
        if config.space_threshold == 0 {
            return Err(FingerspellError::InvalidConfig(
                "space_threshold must be at least 1".to_string(),
            ));
        }
        for token in &config.multi_char_tokens {
            if token.chars().count() < 2 {
                return Err(FingerspellError::InvalidConfig(format!(
                    "multi-char token {token:?} is shorter than 2 characters"
                )));
            }
        }
        if config.fast_letters.iter().any(|l| l.is_empty()) {
            return Err(FingerspellError::InvalidConfig(
                "fast_letters must not contain empty labels".to_string(),
            ));
        }

        let relaxed_run_length = config.min_run_length / 2;
        let fast_lowered = config
            .fast_letters
            .iter()
            .map(|l| l.to_lowercase())
            .collect();
        let mut multi_by_length = config.multi_char_tokens.clone();
        multi_by_length.sort_by(|a, b| b.len().cmp(&a.len()));

        Ok(Self {
            config,
            relaxed_run_length,
            fast_lowered,
            multi_by_length,
        })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Splits the raw letter stream into tokens, greedily consuming the
    /// longest configured multi-char label at each position.
    pub fn tokenize(&self, input: &str) -> Vec<String> {
        let mut carry = input.to_string();
        let mut tokens = Vec::new();
        drain_tokens(&self.multi_by_length, &mut carry, true, &mut tokens);
        tokens
    }

    /// Decodes a complete letter stream into text: letters plus single
    /// spaces where a run's dwell crossed the space threshold.
    pub fn decode(&self, input: &str) -> String {
        self.decode_tokens(&self.tokenize(input))
    }

    fn decode_tokens(&self, tokens: &[String]) -> String {
        let mut out = String::new();
        if tokens.is_empty() {
            return out;
        }

        let ctx = self.config.error_context;
        let mut current = tokens[0].as_str();
        let mut count = 1usize;

        // i == tokens.len() is the virtual end-of-stream step that flushes
        // the final run.
        for i in 1..=tokens.len() {
            let extends = i < tokens.len()
                && (tokens[i] == current
                    || (i > ctx
                        && i + ctx < tokens.len()
                        && tokens[i - ctx] == current
                        && tokens[i + ctx] == current));

            if extends {
                count += 1;
            } else {
                self.flush_run(current, count, &mut out);
                if i < tokens.len() {
                    current = tokens[i].as_str();
                    count = 1;
                }
            }
        }

        out
    }

    fn flush_run(&self, letter: &str, count: usize, out: &mut String) {
        if count >= self.config.min_run_length
            || (self.is_fast(letter) && count >= self.relaxed_run_length)
        {
            out.push_str(letter);
            if count >= self.config.space_threshold {
                out.push(' ');
            }
        }
    }

    fn is_fast(&self, letter: &str) -> bool {
        let lowered = letter.to_lowercase();
        self.fast_lowered.iter().any(|f| *f == lowered)
    }
}

/// Incremental variant of [`LetterStreamDecoder`] for live, unbounded
/// streams. Tokenization carries partial multi-char matches across pushes,
/// and the accept decision for each token is deferred until `error_context`
/// tokens of lookahead exist (or the stream is finished), so the result is
/// byte-identical to a batch decode of the concatenated input.
pub struct StreamingDecoder {
    decoder: LetterStreamDecoder,
    carry: String,
    /// Tokens consumed into the run logic; capped at `error_context` so the
    /// front is always the bridging lookback `tokens[i - ctx]`.
    recent: VecDeque<String>,
    /// Tokens awaiting lookahead; front is the next token to decide.
    pending: VecDeque<String>,
    next_index: usize,
    current: Option<String>,
    count: usize,
    out: String,
}

impl StreamingDecoder {
    pub fn new(config: DecoderConfig) -> Result<Self, FingerspellError> {
        Ok(Self {
            decoder: LetterStreamDecoder::new(config)?,
            carry: String::new(),
            recent: VecDeque::new(),
            pending: VecDeque::new(),
            next_index: 0,
            current: None,
            count: 0,
            out: String::new(),
        })
    }

    /// Feeds another chunk of the raw letter stream.
    pub fn push_str(&mut self, chunk: &str) {
        self.carry.push_str(chunk);
        let mut tokens = Vec::new();
        drain_tokens(
            &self.decoder.multi_by_length,
            &mut self.carry,
            false,
            &mut tokens,
        );
        self.pending.extend(tokens);
        self.drain_decidable(false);
    }

    /// Flushes the remaining state and returns the full decoded text.
    pub fn finish(mut self) -> String {
        let mut tokens = Vec::new();
        drain_tokens(
            &self.decoder.multi_by_length,
            &mut self.carry,
            true,
            &mut tokens,
        );
        self.pending.extend(tokens);
        self.drain_decidable(true);

        if let Some(current) = self.current.take() {
            self.decoder.flush_run(&current, self.count, &mut self.out);
        }
        self.out
    }

    fn drain_decidable(&mut self, finishing: bool) {
        let ctx = self.decoder.config.error_context;
        // Token i can only be bridged once token i + ctx has arrived; before
        // finish() we therefore hold back the last ctx tokens.
        while self.pending.len() > ctx || (finishing && !self.pending.is_empty()) {
            let Some(token) = self.pending.pop_front() else {
                break;
            };
            // After the pop, pending[ctx - 1] is tokens[i + ctx].
            let ahead = if ctx == 0 {
                None
            } else {
                self.pending.get(ctx - 1).cloned()
            };
            self.step(token, ahead);
        }
    }

    fn step(&mut self, token: String, ahead: Option<String>) {
        let i = self.next_index;
        self.next_index += 1;

        let ctx = self.decoder.config.error_context;
        let decided = match &self.current {
            None => {
                self.current = Some(token.clone());
                self.count = 1;
                true
            }
            Some(current) => {
                let behind = self.recent.front();
                let extends = token == *current
                    || (i > ctx
                        && ahead.as_deref() == Some(current.as_str())
                        && behind.map(|b| b.as_str()) == Some(current.as_str()));
                if extends {
                    self.count += 1;
                }
                extends
            }
        };

        if !decided {
            let current = self.current.take().unwrap_or_default();
            self.decoder.flush_run(&current, self.count, &mut self.out);
            self.current = Some(token.clone());
            self.count = 1;
        }

        self.recent.push_back(token);
        while self.recent.len() > ctx {
            self.recent.pop_front();
        }
    }
}

/// Shared tokenizer core. Consumes as much of `carry` as possible; when
/// `finishing` is false, a trailing proper prefix of a multi-char token is
/// left in `carry` for the next chunk to complete.
fn drain_tokens(
    multi_by_length: &[String],
    carry: &mut String,
    finishing: bool,
    out: &mut Vec<String>,
) {
    loop {
        if carry.is_empty() {
            return;
        }

        if let Some(token) = multi_by_length.iter().find(|t| carry.starts_with(*t)) {
            out.push(token.clone());
            carry.drain(..token.len());
            continue;
        }

        if !finishing
            && multi_by_length
                .iter()
                .any(|t| t.starts_with(carry.as_str()) && t.len() > carry.len())
        {
            return;
        }

        let Some(ch) = carry.chars().next() else {
            return;
        };
        out.push(ch.to_string());
        carry.drain(..ch.len_utf8());
    }
}
