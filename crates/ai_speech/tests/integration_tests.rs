//! Integration tests for ai_speech crate
//!
//! Exercises provider construction from a TOML configuration and the error
//! paths that do not need the native tools installed.

use std::path::PathBuf;
use std::time::Duration;

use ai_speech::{
    AplayPlayer, ArecordRecorder, AudioData, AudioFormat, AudioPlayer, AudioRecorder,
    PiperProvider, SpeechConfig, SpeechError, SpeechToText, TextToSpeech, TranscriptionOptions,
    WhisperCppProvider,
};

fn config_with_missing_tools() -> SpeechConfig {
    let toml = r#"
        [stt]
        executable_path = "/nonexistent/whisper-cli"
        models_dir = "/nonexistent/models"
        model_path = "/nonexistent/models/ggml-base.bin"

        [tts]
        executable_path = "/nonexistent/piper"
        model_path = "/nonexistent/models/voice.onnx"

        [recorder]
        executable_path = "/nonexistent/arecord"

        [player]
        executable_path = "/nonexistent/aplay"
    "#;
    toml::from_str(toml).unwrap()
}

#[test]
fn all_providers_build_from_config() {
    let config = config_with_missing_tools();
    config.validate().unwrap();

    assert!(WhisperCppProvider::new(config.stt).is_ok());
    assert!(PiperProvider::new(config.tts).is_ok());
    assert!(ArecordRecorder::new(config.recorder).is_ok());
    assert!(AplayPlayer::new(config.player).is_ok());
}

#[tokio::test]
async fn nothing_is_available_without_tools() {
    let config = config_with_missing_tools();

    let stt = WhisperCppProvider::new(config.stt).unwrap();
    let tts = PiperProvider::new(config.tts).unwrap();
    let recorder = ArecordRecorder::new(config.recorder).unwrap();
    let player = AplayPlayer::new(config.player).unwrap();

    assert!(!stt.is_available().await);
    assert!(!tts.is_available().await);
    assert!(!recorder.is_available().await);
    assert!(!player.is_available().await);
}

#[tokio::test]
async fn listening_pipeline_fails_at_the_recorder() {
    let config = config_with_missing_tools();
    let recorder = ArecordRecorder::new(config.recorder).unwrap();

    let err = recorder.record(Duration::from_secs(1)).await.unwrap_err();
    assert!(matches!(err, SpeechError::NotAvailable(_)));
}

#[tokio::test]
async fn transcription_reports_missing_named_model() {
    let config = config_with_missing_tools();
    let stt = WhisperCppProvider::new(config.stt).unwrap();
    let audio = AudioData::new(vec![0; 44], AudioFormat::Wav);

    let err = stt
        .transcribe(
            audio,
            &TranscriptionOptions::default()
                .with_model("small")
                .with_language("en"),
        )
        .await
        .unwrap_err();

    match err {
        SpeechError::ModelNotAvailable(path) => {
            assert_eq!(
                PathBuf::from(path),
                PathBuf::from("/nonexistent/models/ggml-base.bin")
            );
        },
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn speaking_pipeline_rejects_blank_text_before_spawning() {
    let config = config_with_missing_tools();
    let tts = PiperProvider::new(config.tts).unwrap();

    let err = tts.synthesize("").await.unwrap_err();
    assert!(matches!(err, SpeechError::SynthesisFailed(_)));
}
