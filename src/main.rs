use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};

use vgm_engine::io::{FileResource, Resource};
use vgm_engine::{logging, open_from_resource, Cli, StreamHandle};

const RENDER_FRAMES: usize = 4096;

fn write_pcm(handle: &mut StreamHandle, total: usize, out: &mut impl Write) -> Result<usize> {
    let channels = handle.desc.channels;
    let mut buffer = vec![0i16; RENDER_FRAMES * channels];
    let mut bytes = Vec::with_capacity(buffer.len() * 2);
    let mut written = 0;

    while written < total {
        let want = (total - written).min(RENDER_FRAMES);
        let got = handle.render(&mut buffer, want);
        if got == 0 {
            break;
        }

        bytes.clear();
        for sample in &buffer[..got * channels] {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        out.write_all(&bytes)?;
        written += got;
    }

    out.flush()?;
    Ok(written)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if logging::init(cli.log_level()).is_err() {
        eprintln!("logger already installed");
    }

    let config = cli.to_play_config()?;

    let mut resource = FileResource::open_path(&cli.file)
        .with_context(|| format!("Failed to open {}", cli.file.display()))?;
    resource.set_stream_index(config.subsong);
    let handle = open_from_resource(&mut resource);
    resource.close();

    let Some(mut handle) = handle else {
        anyhow::bail!("{}: format not recognized", cli.file.display());
    };

    handle.apply_config(&config);
    let play_samples = handle.play_samples(&config).max(0) as usize;

    println!("{}", handle.describe(4096));
    println!("play duration: {} samples", play_samples);

    if let Some(ref output) = cli.output {
        let file = File::create(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;
        let mut out = BufWriter::new(file);
        let written = write_pcm(&mut handle, play_samples, &mut out)?;
        log::info!("wrote {} frames to {}", written, output.display());
    }

    handle.close();
    Ok(())
}
