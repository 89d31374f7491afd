//! Console adapters - Text-mode stand-ins for the microphone and speaker
//!
//! The listening side reads one line per human turn, bounded by the capture
//! duration; the speaking side writes the machine's reply as a line.

use std::fmt;

use application::error::ApplicationError;
use application::ports::{ListenRequest, ListeningPort, SpeakingPort};
use async_trait::async_trait;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines, Stdin, Stdout,
};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// Prefix written before each machine reply
pub const REPLY_PREFIX: &str = "parley> ";

/// Reads the human turn from a line-oriented input
pub struct ConsoleListeningAdapter<R> {
    lines: Mutex<Lines<R>>,
}

impl<R> fmt::Debug for ConsoleListeningAdapter<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleListeningAdapter").finish_non_exhaustive()
    }
}

impl<R: AsyncBufRead + Unpin> ConsoleListeningAdapter<R> {
    /// Read turns from the given input
    pub fn new(reader: R) -> Self {
        Self {
            lines: Mutex::new(reader.lines()),
        }
    }
}

impl ConsoleListeningAdapter<BufReader<Stdin>> {
    /// Read turns from standard input
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R> ListeningPort for ConsoleListeningAdapter<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    #[instrument(skip(self), fields(duration = ?request.duration))]
    async fn capture_and_transcribe(
        &self,
        request: ListenRequest,
    ) -> Result<String, ApplicationError> {
        let mut lines = self.lines.lock().await;
        match tokio::time::timeout(request.duration, lines.next_line()).await {
            Ok(Ok(Some(line))) => {
                debug!(chars = line.len(), "Read console input");
                Ok(line.trim().to_string())
            },
            Ok(Ok(None)) => Err(ApplicationError::Recording(
                "console input closed".to_string(),
            )),
            Ok(Err(e)) => Err(ApplicationError::Recording(format!(
                "failed to read console input: {e}"
            ))),
            Err(_) => Err(ApplicationError::Recording(format!(
                "no console input within {:?}",
                request.duration
            ))),
        }
    }
}

/// Writes the machine turn to a text output
pub struct ConsoleSpeakingAdapter<W> {
    writer: Mutex<W>,
}

impl<W> fmt::Debug for ConsoleSpeakingAdapter<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleSpeakingAdapter").finish_non_exhaustive()
    }
}

impl<W: AsyncWrite + Unpin> ConsoleSpeakingAdapter<W> {
    /// Write replies to the given output
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Recover the output
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl ConsoleSpeakingAdapter<Stdout> {
    /// Write replies to standard output
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W> SpeakingPort for ConsoleSpeakingAdapter<W>
where
    W: AsyncWrite + Unpin + Send,
{
    #[instrument(skip(self, text))]
    async fn synthesize_and_play(&self, text: String) -> Result<(), ApplicationError> {
        let mut writer = self.writer.lock().await;
        let line = format!("{REPLY_PREFIX}{text}\n");
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ApplicationError::Playback(format!("failed to write reply: {e}")))?;
        writer
            .flush()
            .await
            .map_err(|e| ApplicationError::Playback(format!("failed to flush reply: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::time::Duration;

    use application::ports::FileTranscriptionRequest;

    use super::*;

    fn listener(input: &str) -> ConsoleListeningAdapter<Cursor<Vec<u8>>> {
        ConsoleListeningAdapter::new(Cursor::new(input.as_bytes().to_vec()))
    }

    #[tokio::test]
    async fn reads_one_line_per_turn() {
        let adapter = listener("hello\n  world  \n");
        let request = ListenRequest::new(Duration::from_secs(1));

        assert_eq!(
            adapter.capture_and_transcribe(request.clone()).await.unwrap(),
            "hello"
        );
        assert_eq!(
            adapter.capture_and_transcribe(request).await.unwrap(),
            "world"
        );
    }

    #[tokio::test]
    async fn closed_input_is_a_recording_failure() {
        let adapter = listener("");
        let result = adapter
            .capture_and_transcribe(ListenRequest::new(Duration::from_secs(1)))
            .await;
        assert!(matches!(result, Err(ApplicationError::Recording(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn silent_input_times_out() {
        let (_writer, reader) = tokio::io::duplex(64);
        let adapter = ConsoleListeningAdapter::new(BufReader::new(reader));

        let result = adapter
            .capture_and_transcribe(ListenRequest::new(Duration::from_secs(5)))
            .await;

        match result {
            Err(ApplicationError::Recording(msg)) => assert!(msg.contains("5s")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn writes_prefixed_reply() {
        let adapter = ConsoleSpeakingAdapter::new(Vec::new());
        adapter
            .synthesize_and_play("I heard you say: hi".to_string())
            .await
            .unwrap();

        let output = String::from_utf8(adapter.into_inner()).unwrap();
        assert_eq!(output, "parley> I heard you say: hi\n");
    }

    #[tokio::test]
    async fn audio_files_are_not_supported() {
        let adapter = listener("ignored\n");
        let result = adapter
            .transcribe_file(FileTranscriptionRequest::from_listen(
                "clip.wav",
                ListenRequest::new(Duration::from_secs(1)),
            ))
            .await;
        assert!(matches!(result, Err(ApplicationError::Transcription(_))));

        let speaker = ConsoleSpeakingAdapter::new(Vec::<u8>::new());
        let result = speaker
            .synthesize_to_file("hi".to_string(), PathBuf::from("reply.wav"), true)
            .await;
        assert!(matches!(result, Err(ApplicationError::Synthesis(_))));
        assert!(speaker.into_inner().is_empty());
    }
}
