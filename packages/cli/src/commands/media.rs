use super::{ai_client, open_session, print_notices};
use crate::config::Config;
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use folio_ai::{audio, AiBackend, AspectRatio};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ImageArgs {
    pub prompt: String,

    /// 1:1, 3:4, 4:3, 9:16 or 16:9
    #[arg(short, long, default_value = "1:1")]
    pub aspect_ratio: AspectRatio,

    /// Write the JPEG to this file
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Add the image to the asset catalog
    #[arg(long)]
    pub save_asset: bool,
}

pub async fn image(args: ImageArgs, cwd: &str) -> Result<()> {
    if args.out.is_none() && !args.save_asset {
        return Err(anyhow!("Pass --out <file> and/or --save-asset"));
    }

    let (config, mut session) = open_session(cwd)?;
    let client = ai_client(&config)?;

    println!("{} Generating {} image...", "🎨".bright_blue(), args.aspect_ratio.as_str());
    let jpeg = client.generate_image(&args.prompt, args.aspect_ratio).await?;

    if let Some(out) = &args.out {
        std::fs::write(out, &jpeg)?;
        println!("  {} Wrote {}", "✓".green(), out.display());
    }
    if args.save_asset {
        let asset = session.save_generated_image(&args.prompt, &jpeg)?;
        print_notices(&mut session);
        println!("  {} Asset {}", "✓".green(), asset.id.cyan());
    }
    Ok(())
}

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Image file (png, jpeg, webp or gif)
    pub path: PathBuf,

    #[arg(short, long, default_value = "Describe this image in detail.")]
    pub prompt: String,
}

pub async fn analyze(args: AnalyzeArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let client = ai_client(&config)?;

    let mime_type = mime_type_for(&args.path)
        .ok_or_else(|| anyhow!("Unsupported image type: {}", args.path.display()))?;
    let bytes = std::fs::read(&args.path)?;

    println!("{} Analyzing {}...", "🔍".bright_blue(), args.path.display());
    let text = client.analyze_image(&args.prompt, &bytes, mime_type).await?;
    println!();
    println!("{text}");
    Ok(())
}

#[derive(Debug, Args)]
pub struct SpeakArgs {
    pub text: String,

    /// Output file for 24 kHz mono 16-bit little-endian PCM
    #[arg(short, long, default_value = "speech.pcm")]
    pub out: PathBuf,
}

pub async fn speak(args: SpeakArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let client = ai_client(&config)?;

    println!("{} Synthesizing with voice {}...", "🔊".bright_blue(), config.ai.voice.cyan());
    let pcm = client.synthesize_speech(&args.text).await?;
    std::fs::write(&args.out, &pcm)?;

    println!(
        "  {} Wrote {} ({:.1}s at {} Hz)",
        "✓".green(),
        args.out.display(),
        audio::pcm16_duration(pcm.len(), audio::OUTPUT_SAMPLE_RATE).as_secs_f32(),
        audio::OUTPUT_SAMPLE_RATE
    );
    Ok(())
}

fn mime_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(mime_type_for(Path::new("cover.JPG")), Some("image/jpeg"));
        assert_eq!(mime_type_for(Path::new("map.png")), Some("image/png"));
        assert_eq!(mime_type_for(Path::new("notes.txt")), None);
        assert_eq!(mime_type_for(Path::new("noext")), None);
    }
}
