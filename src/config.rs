use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "jobscout", about = "Multi-source job scraper and compatibility ranker")]
pub struct Config {
    /// Sqlite cache location
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://jobs.db")]
    pub database_url: String,

    /// W3C WebDriver endpoint for scripted-browser rendering (optional)
    #[arg(long, env = "WEBDRIVER_URL")]
    pub webdriver_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// Acquire listings from all sources and cache them
    Scrape {
        /// Search keywords
        #[arg(long, default_value = "python developer")]
        keywords: String,

        /// Target location
        #[arg(long, default_value = "Remote")]
        location: String,

        /// Cap on listings kept per acquisition run
        #[arg(long, default_value = "50")]
        max_jobs: usize,

        /// Overall acquisition deadline in seconds
        #[arg(long, default_value = "120")]
        timeout_secs: u64,
    },
    /// Rank cached (or freshly acquired) listings against a candidate profile
    Discover {
        /// Candidate skills, comma-separated
        #[arg(long, value_delimiter = ',')]
        skills: Vec<String>,

        /// Candidate years of experience
        #[arg(long, default_value = "3")]
        years: u32,

        /// Minimum compatibility score to keep a listing
        #[arg(long, default_value = "30.0")]
        min_score: f64,

        /// Overall acquisition deadline in seconds, if a live scrape is needed
        #[arg(long, default_value = "120")]
        timeout_secs: u64,
    },
    /// Show cache counts per source
    Stats,
    /// Drop cached listings, optionally for a single source
    Clear {
        #[arg(long)]
        source: Option<String>,
    },
}
