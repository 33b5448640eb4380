//! `chemeng`: solve engineering relations with units from the command line.

mod problem;

use std::{fs, path::PathBuf};

use anyhow::{Context as _, Result, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use chemeng::{Context, Precision, Relation, SolveConfig, stoichiometry::Reaction};
use chemeng_units::{Quantity, round_to_significant};

use crate::problem::Problem;

#[derive(Parser)]
#[command(
    name = "chemeng",
    version = env!("CARGO_PKG_VERSION"),
    about = "Solve engineering relations with units"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log solver progress to stderr (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Solve a relation for the one unknown variable
    Solve {
        /// Relation name, as listed by `chemeng relations`
        relation: String,

        /// A variable at the initial point, such as `h=10 yard`
        #[arg(short, long = "initial", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        initial: Vec<(String, String)>,

        /// A variable at the final point, such as `v=unknown`
        #[arg(short, long = "final", value_name = "NAME=VALUE", value_parser = parse_assignment)]
        final_: Vec<(String, String)>,

        /// Unit to report the unknown in (SI if omitted)
        #[arg(short, long, default_value = "")]
        unit: String,

        /// Starting point, in SI, for seeded relations
        #[arg(long)]
        seed: Option<f64>,

        #[command(flatten)]
        precision: PrecisionArgs,
    },

    /// Solve the problem described by a TOML file
    Run {
        /// Path to the problem file
        path: PathBuf,
    },

    /// Balance a chemical equation such as `CH4 + O2 --> CO2 + H2O`
    Balance { equation: String },

    /// Convert a quantity to another unit
    Convert {
        /// Quantity to convert, such as `14.6959 psi`
        quantity: String,

        /// Target unit expression, such as `kPa`
        unit: String,

        /// Round the result to this many significant figures
        #[arg(long)]
        sigfigs: Option<u32>,
    },

    /// List the built-in relations and their variables
    Relations,
}

#[derive(Args, Debug, Default)]
#[group(multiple = false)]
struct PrecisionArgs {
    /// Significant figures to report
    #[arg(long)]
    sigfigs: Option<u32>,

    /// Report as many significant figures as the least precise input
    #[arg(long)]
    input_sigfigs: bool,

    /// Report roots unrounded
    #[arg(long)]
    full: bool,
}

impl PrecisionArgs {
    fn precision(&self) -> Precision {
        if self.full {
            Precision::Full
        } else if self.input_sigfigs {
            Precision::FromInputs
        } else {
            self.sigfigs
                .map_or_else(Precision::default, Precision::Significant)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();

    match cli.command {
        Command::Solve {
            relation,
            initial,
            final_,
            unit,
            seed,
            precision,
        } => {
            let context = Context::new(initial, final_, &unit)?;
            let config = SolveConfig {
                precision: precision.precision(),
                seed,
                ..SolveConfig::default()
            };
            run_solve(&relation, &context, &config)
        }
        Command::Run { path } => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let problem = Problem::from_toml(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            debug!(path = %path.display(), relation = %problem.relation, "loaded problem");

            let context = problem.context()?;
            run_solve(&problem.relation, &context, &problem.config())
        }
        Command::Balance { equation } => {
            let balanced = Reaction::parse(&equation)?.balance()?;
            println!("{balanced}");
            Ok(())
        }
        Command::Convert {
            quantity,
            unit,
            sigfigs,
        } => {
            let converted = Quantity::parse(&quantity)?
                .convert_to(&unit)
                .with_context(|| format!("converting `{quantity}` to `{unit}`"))?;
            match sigfigs {
                Some(0) => bail!("--sigfigs must be at least 1"),
                Some(n) => {
                    let magnitude = round_to_significant(converted.magnitude(), n);
                    println!("{}", Quantity::new(magnitude, converted.unit().clone()));
                }
                None => println!("{converted}"),
            }
            Ok(())
        }
        Command::Relations => {
            for relation in chemeng::catalog().iter() {
                print!("{}", describe(relation));
            }
            Ok(())
        }
    }
}

fn run_solve(name: &str, context: &Context, config: &SolveConfig) -> Result<()> {
    let relation = chemeng::catalog().get(name)?;
    let solution = chemeng::solve_with(relation, context, config)
        .with_context(|| format!("solving `{name}` for {}", context.unknown_name()))?;

    debug!(
        residual = solution.residual,
        iters = solution.iters,
        "solved {}",
        solution.symbol
    );
    println!("{}", solution.display);
    Ok(())
}

/// Splits a `NAME=VALUE` argument.
fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{arg}`"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in `{arg}`"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// A relation's name, description, and variables, one per line.
fn describe(relation: &dyn Relation) -> String {
    let mut text = format!("{}: {}\n", relation.name(), relation.description());
    for variable in relation.variables() {
        let points: Vec<String> = variable.points.iter().map(ToString::to_string).collect();
        text.push_str(&format!(
            "    {:<4} {} [{}] ({})\n",
            variable.symbol,
            variable.description,
            variable.si_unit(),
            points.join(", "),
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn splits_assignments() {
        assert_eq!(
            parse_assignment("rho=998.87 kg/m**3").unwrap(),
            ("rho".to_string(), "998.87 kg/m**3".to_string())
        );
        assert_eq!(
            parse_assignment(" v = unknown ").unwrap(),
            ("v".to_string(), "unknown".to_string())
        );
        assert!(parse_assignment("v").is_err());
        assert!(parse_assignment("=3 m").is_err());
    }

    #[test]
    fn parses_a_solve_command() {
        let cli = Cli::try_parse_from([
            "chemeng", "solve", "bernoulli", "-i", "v=0 ft/s", "-i", "h=10 yard", "-f",
            "v=unknown", "-u", "m/s", "--sigfigs", "3",
        ])
        .unwrap();

        let Command::Solve {
            relation,
            initial,
            final_,
            unit,
            precision,
            ..
        } = cli.command
        else {
            panic!("expected the solve command");
        };
        assert_eq!(relation, "bernoulli");
        assert_eq!(initial.len(), 2);
        assert_eq!(final_[0], ("v".to_string(), "unknown".to_string()));
        assert_eq!(unit, "m/s");
        assert_eq!(precision.precision(), Precision::Significant(3));
    }

    #[test]
    fn precision_flags_are_exclusive() {
        let parsed = Cli::try_parse_from([
            "chemeng", "solve", "bernoulli", "--sigfigs", "3", "--full",
        ]);
        assert!(parsed.is_err());
        assert_eq!(PrecisionArgs::default().precision(), Precision::Significant(4));
    }

    #[test]
    fn describes_relations() {
        let bernoulli = chemeng::catalog().get("bernoulli").unwrap();
        let text = describe(bernoulli);
        assert!(text.starts_with("bernoulli: "));
        assert!(text.contains("[kg/m^3] (initial, final)"));
    }
}
