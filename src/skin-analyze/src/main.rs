use std::error::Error;
use std::fs;
use std::path::PathBuf;
use structopt::StructOpt;

use log::{error, info};
use skin_serve::{analyze_upload, RemoteAnalyzer, Timer, Upload};

#[derive(StructOpt, Debug)]
#[structopt(
    name = "skin-analyze",
    about = "CLI app to run a local image through a skin analysis model"
)]
struct CmdArgs {
    #[structopt(help = "Endpoint of the skin analysis model server")]
    analyzer_url: String,

    #[structopt(parse(from_os_str), help = "Path to the image to analyze")]
    image_path: PathBuf,
}

/// Content type the endpoint would have been given for `bytes`, going by
/// the file's signature rather than its extension.
fn sniff_content_type(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    let args = CmdArgs::from_args();

    let bytes = fs::read(&args.image_path)?;
    let upload = Upload::new(Some(sniff_content_type(&bytes)), bytes);

    let analyzer = RemoteAnalyzer::new(&args.analyzer_url)?;

    let mut t = Timer::new_start(&format!("Analyzing {}", args.image_path.display()));
    let outcome = analyze_upload(Some(upload), &analyzer).await;
    t.stop();

    match outcome {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome.to_json()?)?);
            info!("Analysis took {} msec", t.elapsed_ms());
            Ok(())
        }
        Err(err) => {
            error!("{}", err);
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skin_serve::ServeError;

    #[test]
    fn png_signature_is_an_image() {
        let png = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];
        assert_eq!(sniff_content_type(&png), "image/png");
    }

    #[test]
    fn unknown_bytes_fail_the_type_check() {
        let ct = sniff_content_type(b"just some text");
        assert_eq!(ct, "application/octet-stream");
        assert!(!Upload::new(Some(ct), Vec::new()).is_image());

        assert_eq!(ServeError::NotAnImage.to_string(), "Uploaded file is not an image");
    }
}
