use clap::{arg, crate_version, value_parser, Command};
use tscompress::harness::{run_source, SystemClock};
use tscompress::{CodecKind, Sample, SampleBlock, SampleSource};

const RCH: &str = "unreachable was reached";
const CSV_HEADER: &str = "codec,width,count,raw_bytes,encoded_bytes,encode_secs,decode_secs,ok";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let long_help = "\
Examples:
---------
Benchmark a synthetic walk:   `tscompress bench --codec all --width 32 --count 10000`
Round-trip a sample file:     `tscompress roundtrip --codec log-huffman --input walk.i32 --width 32`";

    let widths = ["8", "16", "32", "64"];

    let mut main_cmd = Command::new("tscompress")
        .about("Benchmark lossless integer-sample codecs")
        .after_long_help(long_help)
        .version(crate_version!());

    main_cmd = main_cmd.subcommand(
        Command::new("bench")
            .about("round-trip a synthetic sample walk through one or all codecs")
            .arg(arg!(-c --codec <CODEC> "codec to run, or \"all\""))
            .arg(arg!(-w --width <BITS> "sample width in bits").value_parser(widths))
            .arg(
                arg!(-n --count <N> "number of samples to generate")
                    .value_parser(value_parser!(usize))
                    .default_value("1000"),
            )
            .arg(arg!(--delta "apply a delta pre-pass before encoding"))
            .arg(
                arg!(--seed <SEED> "PRNG seed for the synthetic walk")
                    .value_parser(value_parser!(u64))
                    .default_value("0"),
            ),
    );

    main_cmd = main_cmd.subcommand(
        Command::new("roundtrip")
            .about("round-trip a raw little-endian sample file through one codec")
            .arg(arg!(-c --codec <CODEC> "codec to run"))
            .arg(arg!(-w --width <BITS> "sample width in bits").value_parser(widths))
            .arg(arg!(-i --input <PATH> "input path").required(true))
            .arg(arg!(--delta "apply a delta pre-pass before encoding")),
    );

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("bench") {
        let codec_arg = cmd.get_one::<String>("codec").expect(RCH);
        let width_bits: u32 = cmd.get_one::<String>("width").expect(RCH).parse().expect(RCH);
        let count = *cmd.get_one::<usize>("count").expect(RCH);
        let delta = cmd.get_flag("delta");
        let seed = *cmd.get_one::<u64>("seed").expect(RCH);

        let selected: Vec<CodecKind> = if codec_arg == "all" {
            tscompress::codecs::list_codecs().to_vec()
        } else {
            match CodecKind::parse(codec_arg) {
                Some(codec) => vec![codec],
                None => return Err(format!("unknown codec: {codec_arg}").into()),
            }
        };

        let clock = SystemClock;
        let mut source = SyntheticSource { width_bits, count, seed };
        println!("{CSV_HEADER}");
        for codec in selected {
            let (_, report) = run_source(&mut source, codec, delta, &clock)
                .into_iter()
                .next()
                .expect("a synthetic source always yields exactly one block");
            println!("{}", format_csv_line(codec, width_bits, count, &report?));
        }
    }

    if let Some(cmd) = matches.subcommand_matches("roundtrip") {
        let codec_arg = cmd.get_one::<String>("codec").expect(RCH);
        let codec = CodecKind::parse(codec_arg)
            .ok_or_else(|| format!("unknown codec: {codec_arg}"))?;
        let width_bits: u32 = cmd.get_one::<String>("width").expect(RCH).parse().expect(RCH);
        let delta = cmd.get_flag("delta");
        let path = cmd.get_one::<String>("input").expect(RCH);

        let width_bytes = (width_bits / 8) as u8;
        let mut source = FileSource {
            name: path.clone(),
            width_bytes,
            bytes: std::fs::read(path)?,
        };
        let clock = SystemClock;
        let (_, report) = run_source(&mut source, codec, delta, &clock)
            .into_iter()
            .next()
            .expect("a file source always yields exactly one block");
        let report = report?;
        let count = source_sample_count(&source);
        println!("{CSV_HEADER}");
        println!("{}", format_csv_line(codec, width_bits, count, &report));
        if !report.ok {
            return Err("round trip mismatch".into());
        }
    }

    Ok(())
}

fn format_csv_line(
    codec: CodecKind,
    width_bits: u32,
    count: usize,
    report: &tscompress::RoundTripReport,
) -> String {
    format!(
        "{},{},{},{},{},{},{},{}",
        codec.name(),
        width_bits,
        count,
        report.raw_bytes,
        report.encoded_bytes,
        report.encode_time.as_secs_f64(),
        report.decode_time.as_secs_f64(),
        report.ok,
    )
}

fn source_sample_count(source: &FileSource) -> usize {
    source.bytes.len() / source.width_bytes.max(1) as usize
}

/// A [`SampleSource`] over a single deterministic synthetic random walk,
/// regenerated fresh each time `blocks()` is called — the in-repo stand-in
/// for the out-of-scope file-backed sample loader named in `spec.md` §6.
struct SyntheticSource {
    width_bits: u32,
    count: usize,
    seed: u64,
}

impl SampleSource for SyntheticSource {
    fn blocks(&mut self) -> Box<dyn Iterator<Item = SampleBlock> + '_> {
        let walk = synthetic_walk_i64(self.count, self.seed);
        let width_bytes = (self.width_bits / 8) as u8;
        let mut bytes = Vec::with_capacity(self.count * width_bytes as usize);
        match self.width_bits {
            8 => walk.iter().for_each(|&v| bytes.extend_from_slice(&(v as i8).to_le_bytes_vec())),
            16 => walk.iter().for_each(|&v| bytes.extend_from_slice(&(v as i16).to_le_bytes_vec())),
            32 => walk.iter().for_each(|&v| bytes.extend_from_slice(&(v as i32).to_le_bytes_vec())),
            64 => walk.iter().for_each(|&v| bytes.extend_from_slice(&v.to_le_bytes_vec())),
            w => unreachable!("clap restricts --width to 8/16/32/64, got {w}"),
        }
        let block = SampleBlock {
            name: "synthetic".to_string(),
            width_bytes,
            count: self.count,
            bytes,
        };
        Box::new(std::iter::once(block))
    }
}

/// A [`SampleSource`] over one already-read file's worth of raw,
/// little-endian sample bytes — the minimal stand-in for the out-of-scope
/// file-system loader collaborator named in `spec.md` §6.
struct FileSource {
    name: String,
    width_bytes: u8,
    bytes: Vec<u8>,
}

impl SampleSource for FileSource {
    fn blocks(&mut self) -> Box<dyn Iterator<Item = SampleBlock> + '_> {
        let count = source_sample_count(self);
        let block = SampleBlock {
            name: self.name.clone(),
            width_bytes: self.width_bytes,
            count,
            bytes: self.bytes.clone(),
        };
        Box::new(std::iter::once(block))
    }
}

/// Deterministic bounded-step random walk in `i64` space, generated from a
/// xorshift64 PRNG seeded by `seed`. Not cryptographic; purely a
/// reproducible stand-in for real time-series sample data (the out-of-scope
/// file loader / metadata store collaborators in `spec.md` §6).
fn synthetic_walk_i64(count: usize, seed: u64) -> Vec<i64> {
    let mut state = seed ^ 0x9E3779B97F4A7C15;
    if state == 0 {
        state = 1;
    }
    let mut acc: i64 = 0;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let step = (state % 17) as i64 - 8;
        acc = acc.wrapping_add(step);
        out.push(acc);
    }
    out
}
