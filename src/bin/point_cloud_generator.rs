use ar_feature_points::data_loader::save_recorded_session;
use ar_feature_points::synthetic::{SyntheticConfig, generate_session};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic feature point session
    Generate {
        /// Output directory
        #[arg(short, long)]
        output: String,

        /// Number of frames to generate
        #[arg(short, long, default_value = "120")]
        num_frames: usize,

        /// Random seed
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// New points per frame
        #[arg(long, default_value = "40")]
        spawn_rate: usize,

        /// Mean point lifetime in frames
        #[arg(long, default_value = "10")]
        lifetime: usize,

        /// Emit a no-data frame every n frames, 0 for never
        #[arg(long, default_value = "0")]
        no_data_every: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Generate {
            output,
            num_frames,
            seed,
            spawn_rate,
            lifetime,
            no_data_every,
        } => {
            let config = SyntheticConfig {
                seed,
                num_frames,
                spawn_rate,
                lifetime,
                no_data_every,
                ..Default::default()
            };
            let frames = generate_session(&config);
            save_recorded_session(&output, &frames)?;
            println!("Generated {} frames in {}", frames.len(), output);
        }
    }

    Ok(())
}
