//! One-shot analysis from the command line.
//!
//! Usage:
//!   analyze [--json] <text...>
//!   analyze [--json] --file <audio.wav>      (needs DEEPGRAM_API_KEY)
//!   echo "transcript" | analyze [--json]

use std::io::Read;

use speech_biomarker_analyzer::config::AnalyzerConfig;
use speech_biomarker_analyzer::stt::{build_transcriber, mime_for_path};
use speech_biomarker_analyzer::TranscriptAnalyzer;

fn print_usage() {
    eprintln!("usage: analyze [--json] <text...>");
    eprintln!("       analyze [--json] --file <audio-file>");
    eprintln!("       echo \"transcript\" | analyze [--json]");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let mut json_out = false;
    let mut file: Option<String> = None;
    let mut words: Vec<String> = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--json" => json_out = true,
            "--file" | "-f" => file = args.next(),
            "--help" | "-h" => {
                print_usage();
                return;
            }
            _ => words.push(a),
        }
    }

    let config = match AnalyzerConfig::load_default() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("config error: {e:#}");
            std::process::exit(2);
        }
    };
    let analyzer = TranscriptAnalyzer::new(config);

    let transcript = if let Some(path) = file {
        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("cannot read {path}: {e}");
                std::process::exit(2);
            }
        };
        let transcriber = build_transcriber();
        match transcriber.transcribe(&bytes, mime_for_path(&path)).await {
            Some(t) => t,
            None => {
                eprintln!("transcription failed or not configured (set DEEPGRAM_API_KEY)");
                std::process::exit(1);
            }
        }
    } else if !words.is_empty() {
        words.join(" ")
    } else {
        let mut buf = String::new();
        let read_ok = std::io::stdin().read_to_string(&mut buf).is_ok();
        if !read_ok || buf.trim().is_empty() {
            print_usage();
            std::process::exit(2);
        }
        buf.trim().to_string()
    };

    let (score, features) = analyzer.analyze(&transcript);
    let level = analyzer.level_for(score);
    let feedback = analyzer.feedback(score, &features);

    if json_out {
        let out = serde_json::json!({
            "transcript": transcript,
            "depression_score": score,
            "depression_level": level,
            "features": features,
            "feedback": feedback,
            "analyzed_at": chrono::Utc::now(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).expect("serializable analysis")
        );
    } else {
        println!("=== Depression Analysis Results ===");
        println!("Transcript: {transcript}");
        println!("Depression Score: {score:.1}/100");
        println!("Depression Level: {}", level.as_str().to_uppercase());
        println!();
        println!("{feedback}");
    }
}
