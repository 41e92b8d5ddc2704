use clap::Parser;

#[derive(Parser, Debug)]
pub struct Args {
    #[clap(long, default_value = "./res/bg.mp4")]
    pub background: String,

    #[clap(long, default_value = "shorts_tmp")]
    pub work_dir: String,

    #[clap(long, default_value = "en-US-ChristopherNeural")]
    pub voice: String,

    /// YouTube category id for the uploads.
    #[clap(long, default_value = "24")]
    pub category: String,

    /// Use this topic instead of picking one at random.
    #[clap(long)]
    pub topic: Option<String>,

    /// Stop after the videos are rendered.
    #[clap(long)]
    pub skip_upload: bool,
}
