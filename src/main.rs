use anyhow::Context;
use careerfit::{CsvLoader, Recommender, RecommenderConfig};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Recommend careers from your interests and skills
#[derive(Parser, Debug)]
#[command(name = "careerfit")]
#[command(about = "Career recommendations from a survey corpus", long_about = None)]
struct Args {
    /// Path to the survey CSV
    #[arg(short, long)]
    corpus: PathBuf,

    /// JSON configuration file; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Neighbours retrieved per query
    #[arg(short = 'k', long)]
    neighbors: Option<usize>,

    /// Latent dimensions kept by the SVD
    #[arg(long)]
    components: Option<usize>,

    /// TF-IDF vocabulary cap
    #[arg(long)]
    max_features: Option<usize>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Recommend careers for one set of interests and skills
    Recommend {
        #[arg(short, long, default_value = "")]
        interests: String,
        #[arg(short, long, default_value = "")]
        skills: String,
    },
    /// List the interests and skills seen in the corpus
    Options,
    /// Read one query per line from stdin
    Repl,
}

impl Args {
    fn recommender_config(&self) -> anyhow::Result<RecommenderConfig> {
        let mut config = match &self.config {
            Some(path) => RecommenderConfig::from_json_file(path)
                .with_context(|| format!("failed to read config {}", path.display()))?,
            None => RecommenderConfig::default(),
        };
        if let Some(k) = self.neighbors {
            config.n_neighbors = k;
        }
        if let Some(c) = self.components {
            config.n_components = c;
        }
        if let Some(m) = self.max_features {
            config.max_features = m;
        }
        config.validate()?;
        Ok(config)
    }
}

fn print_recommendations(out: &mut impl Write, careers: &[String]) -> io::Result<()> {
    if careers.is_empty() {
        return writeln!(out, "No suitable career recommendations found.");
    }
    writeln!(out, "Recommended Careers:")?;
    for (i, career) in careers.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, career)?;
    }
    Ok(())
}

fn print_options(out: &mut impl Write, title: &str, options: &[&str]) -> io::Result<()> {
    writeln!(out, "{title}:")?;
    for option in options {
        writeln!(out, "  {option}")?;
    }
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting careerfit v{}", env!("CARGO_PKG_VERSION"));
    let config = args.recommender_config()?;

    let corpus = CsvLoader::load(&args.corpus, &config.columns)
        .with_context(|| format!("failed to load corpus {}", args.corpus.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Command::Options = args.command {
        print_options(&mut out, "Interests", &corpus.interest_options())?;
        print_options(&mut out, "Skills", &corpus.skill_options())?;
        return Ok(ExitCode::SUCCESS);
    }

    let recommender = Recommender::fit(corpus, &config)?;

    match &args.command {
        Command::Recommend { interests, skills } => {
            if format!("{interests} {skills}").trim().is_empty() {
                eprintln!("Please select your interests and skills!");
                return Ok(ExitCode::FAILURE);
            }
            print_recommendations(&mut out, &recommender.recommend_for(interests, skills))?;
        }
        Command::Repl => {
            for line in io::stdin().lock().lines() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                print_recommendations(&mut out, &recommender.recommend(&line))?;
                out.flush()?;
            }
        }
        Command::Options => {}
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_recommendations() {
        let mut buf = Vec::new();
        print_recommendations(&mut buf, &["Pilot".to_string(), "Chef".to_string()]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Recommended Careers:\n1. Pilot\n2. Chef\n"
        );

        let mut buf = Vec::new();
        print_recommendations(&mut buf, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "No suitable career recommendations found.\n"
        );
    }

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "careerfit", "--corpus", "x.csv", "-k", "3", "--components", "10", "recommend",
            "--interests", "art",
        ]);
        let config = args.recommender_config().unwrap();
        assert_eq!(config.n_neighbors, 3);
        assert_eq!(config.n_components, 10);
        assert_eq!(config.max_features, 1000);
        assert!(matches!(args.command, Command::Recommend { .. }));
    }
}
