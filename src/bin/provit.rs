use clap::{App, Arg};
#[macro_use]
extern crate log;

fn main() -> provit::Result<()> {
    let matches = App::new("provit")
        .version("0.1")
        .author("Bansho Masutani")
        .about("Train a profile HMM from an aligned FASTA and score queries: [FASTA]x[FASTA]->[TSV]")
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Debug mode"),
        )
        .arg(
            Arg::with_name("alignment")
                .long("alignment")
                .short("a")
                .value_name("FASTA")
                .takes_value(true)
                .required(true)
                .help("Training alignment. Aligned FASTA format."),
        )
        .arg(
            Arg::with_name("queries")
                .long("queries")
                .short("q")
                .value_name("FASTA")
                .takes_value(true)
                .help("Unaligned query sequences. FASTA format. Reads stdin when omitted."),
        )
        .arg(
            Arg::with_name("gap")
                .long("gap")
                .takes_value(true)
                .default_value("-")
                .help("Gap character of the alignment."),
        )
        .arg(
            Arg::with_name("threshold")
                .long("threshold")
                .takes_value(true)
                .default_value("0.5")
                .help("Match-column threshold, in (0,1]."),
        )
        .arg(
            Arg::with_name("emission_pseudocount")
                .long("emission_pseudocount")
                .takes_value(true)
                .default_value("1")
                .help("Pseudocount for emission smoothing."),
        )
        .arg(
            Arg::with_name("transition_pseudocount")
                .long("transition_pseudocount")
                .takes_value(true)
                .default_value("1")
                .help("Pseudocount for transition smoothing."),
        )
        .arg(
            Arg::with_name("threads")
                .long("threads")
                .short("t")
                .takes_value(true)
                .default_value("1")
                .help("Number of threads"),
        )
        .get_matches();
    let level = match matches.occurrences_of("verbose") {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    let threads: usize = matches
        .value_of("threads")
        .and_then(|x| x.parse().ok())
        .unwrap();
    if let Err(why) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        debug!("{:?}", why);
    }
    debug!("Start");
    let alignment = provit::fasta::read_fasta(&matches.value_of("alignment"))?;
    let queries = provit::fasta::read_fasta(&matches.value_of("queries"))?;
    let gap = matches
        .value_of("gap")
        .filter(|x| x.len() == 1)
        .map(|x| x.as_bytes()[0])
        .ok_or_else(|| provit::Error::InvalidInput("gap must be one character".to_string()))?;
    let parse_f64 = |name: &str| -> provit::Result<f64> {
        matches
            .value_of(name)
            .and_then(|x| x.parse().ok())
            .ok_or_else(|| provit::Error::InvalidInput(format!("could not parse --{}", name)))
    };
    let config = provit::model::BuildConfig {
        gap,
        match_threshold: parse_f64("threshold")?,
        emission_pseudocount: parse_f64("emission_pseudocount")?,
        transition_pseudocount: parse_f64("transition_pseudocount")?,
    };
    let alphabet = provit::alphabet::Alphabet::dna(gap);
    let model = provit::build_profile(&alignment, &alphabet, &config)?;
    info!(
        "model:{} columns, {} match states",
        model.column_count(),
        model.states().match_count()
    );
    let seqs: Vec<_> = queries.iter().map(|(_, seq)| seq.as_slice()).collect();
    let results = provit::decode_batch(&model, &seqs);
    let stdout = std::io::stdout();
    let mut wtr = std::io::BufWriter::new(stdout.lock());
    use std::io::Write;
    for ((id, _), result) in queries.iter().zip(results) {
        match result {
            Ok(result) => writeln!(wtr, "{}\t{}", id, result).map_err(provit::Error::Io)?,
            Err(why) => warn!("{}:{}", id, why),
        }
    }
    Ok(())
}
