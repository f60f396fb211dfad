use anyhow::Context;
use planlasso::automaton::buchi::ExternalBuchiTranslator;
use planlasso::errors::CompileError;
use std::path::PathBuf;
use std::process::ExitCode;

/// Compiles a PDDL-like domain and an LTL-goal instance into a classical reachability problem.
///
/// `-df <path>`/`-pf <path>` name the compiled domain/problem output files (stdout if
/// omitted); every other argument is a positional input file, the first being the domain and
/// the second the instance. Parsed by hand, not via `clap`'s derive API, because `-df`/`-pf`
/// are each a single two-letter flag rather than a clap short+long pair (spec.md 6; mirrors
/// the original `ltpddl2pddl` CLI's own argv scan).
struct Args {
    domain: PathBuf,
    problem: PathBuf,
    domain_out: Option<PathBuf>,
    problem_out: Option<PathBuf>,
}

fn parse_args<I: Iterator<Item = String>>(argv: I) -> anyhow::Result<Args> {
    let mut domain_out = None;
    let mut problem_out = None;
    let mut positional = Vec::new();

    let mut argv = argv.peekable();
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "-df" => domain_out = Some(PathBuf::from(argv.next().context("-df requires a path argument")?)),
            "-pf" => problem_out = Some(PathBuf::from(argv.next().context("-pf requires a path argument")?)),
            _ if !arg.starts_with('-') => positional.push(PathBuf::from(arg)),
            _ => {} // unrecognized flags are ignored, per spec.md 6
        }
    }

    let mut positional = positional.into_iter();
    let domain = positional.next().context("missing domain file argument")?;
    let problem = positional.next().context("missing problem file argument")?;
    Ok(Args { domain, problem, domain_out, problem_out })
}

fn run(args: Args) -> Result<(), CompileError> {
    let domain_src = std::fs::read_to_string(&args.domain)
        .with_context(|| format!("reading domain file {}", args.domain.display()))
        .map_err(CompileError::parse)?;
    let problem_src = std::fs::read_to_string(&args.problem)
        .with_context(|| format!("reading problem file {}", args.problem.display()))
        .map_err(CompileError::parse)?;

    let mut domain = planlasso::parsing::surface::parse_domain(&domain_src).map_err(CompileError::parse)?;
    let mut instance = planlasso::parsing::surface::parse_instance(&problem_src, &domain).map_err(CompileError::parse)?;

    if let Some(ltl) = instance.ltl_goal.take() {
        let translator = ExternalBuchiTranslator::new();
        let (never_claim, names) =
            planlasso::compile::translate(&domain, &ltl, &translator).map_err(CompileError::translate)?;
        let automaton = planlasso::compile::build_automaton(&never_claim, &names).map_err(CompileError::automaton)?;
        planlasso::compile::apply_automaton(&mut domain, &mut instance, automaton);
    }

    let domain_text = planlasso::emit::emit_domain(&domain);
    let problem_text = planlasso::emit::emit_instance(&instance, &domain);

    match args.domain_out {
        Some(path) => std::fs::write(&path, domain_text)
            .with_context(|| format!("writing compiled domain to {}", path.display()))
            .map_err(CompileError::emit)?,
        None => print!("{domain_text}"),
    }
    match args.problem_out {
        Some(path) => std::fs::write(&path, problem_text)
            .with_context(|| format!("writing compiled problem to {}", path.display()))
            .map_err(CompileError::emit)?,
        None => print!("{problem_text}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e:#}");
            return ExitCode::FAILURE;
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_df_pf_flags_and_positional_files() {
        let args = parse_args(
            ["-df", "out-domain.pddl", "domain.pddl", "-pf", "out-problem.pddl", "problem.pddl"]
                .into_iter()
                .map(String::from),
        )
        .unwrap();
        assert_eq!(args.domain, PathBuf::from("domain.pddl"));
        assert_eq!(args.problem, PathBuf::from("problem.pddl"));
        assert_eq!(args.domain_out, Some(PathBuf::from("out-domain.pddl")));
        assert_eq!(args.problem_out, Some(PathBuf::from("out-problem.pddl")));
    }

    #[test]
    fn defaults_output_paths_to_none_and_ignores_unknown_flags() {
        let args = parse_args(["--verbose", "domain.pddl", "problem.pddl"].into_iter().map(String::from)).unwrap();
        assert!(args.domain_out.is_none());
        assert!(args.problem_out.is_none());
    }
}
