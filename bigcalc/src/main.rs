use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rusty_bignum::Bignum;
use std::cmp::Ordering;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Op {
    /// lhs + rhs
    Add,
    /// lhs - rhs
    Sub,
    /// lhs * rhs
    Mul,
    /// quotient and remainder of lhs / rhs, one per line
    Div,
    /// -1, 0 or 1 as lhs is less than, equal to or greater than rhs
    Cmp,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// the operation to perform
    #[arg(value_enum)]
    op: Op,

    /// left hand operand, hex with an optional sign and 0x prefix
    #[arg(allow_hyphen_values = true)]
    lhs: String,

    /// right hand operand, hex with an optional sign and 0x prefix
    #[arg(allow_hyphen_values = true)]
    rhs: String,

    /// file to write the output to, -o=- => stdout
    #[arg(short, long, default_value_t = String::from("-"))]
    output: String,

    /// force writing to the output file, even if it already exists
    #[arg(short, long, default_value_t = false)]
    force: bool,
}

fn evaluate(op: Op, lhs: &Bignum, rhs: &Bignum) -> Result<String> {
    let out = match op {
        Op::Add => lhs.try_add(rhs)?.to_string(),
        Op::Sub => lhs.try_sub(rhs)?.to_string(),
        Op::Mul => lhs.try_mul(rhs)?.to_string(),
        Op::Div => {
            let (quotient, remainder) = lhs
                .try_divmod(rhs)
                .with_context(|| format!("Dividing {lhs} by {rhs}."))?;
            format!("{quotient}\n{remainder}")
        }
        Op::Cmp => match lhs.cmp(rhs) {
            Ordering::Less => "-1",
            Ordering::Equal => "0",
            Ordering::Greater => "1",
        }
        .to_owned(),
    };

    Ok(out)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Args = Args::try_parse()?;

    let lhs: Bignum = args
        .lhs
        .parse()
        .with_context(|| format!("Parsing {:?} as lhs.", args.lhs))?;
    let rhs: Bignum = args
        .rhs
        .parse()
        .with_context(|| format!("Parsing {:?} as rhs.", args.rhs))?;
    debug!(
        op = ?args.op,
        lhs_words = lhs.num_words(),
        rhs_words = rhs.num_words(),
        "evaluating"
    );

    let result = evaluate(args.op, &lhs, &rhs)?;

    // choose whether to write to stdout or to a file
    let mut out: Box<dyn Write> = match args.output.as_str() {
        "-" => Box::new(std::io::stdout()),
        fname => Box::new(
            OpenOptions::new()
                .write(true)
                .create(true)
                .create_new(!args.force)
                .truncate(true)
                .open(fname)
                .with_context(|| format!("Opening {fname:?} for writing output."))?,
        ),
    };

    out.write_all(result.as_bytes())?;
    out.write_all(b"\n")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(op: Op, lhs: &str, rhs: &str) -> Result<String> {
        evaluate(op, &lhs.parse()?, &rhs.parse()?)
    }

    #[test]
    fn test_evaluate() -> Result<()> {
        assert_eq!(eval(Op::Add, "0xffff0fff", "0x00010001")?, "0x100001000");
        assert_eq!(eval(Op::Sub, "0x1", "0x100000000")?, "-0xffffffff");
        assert_eq!(
            eval(Op::Mul, "0x5004003002001", "-0xfff")?,
            "-0x4ffeffeffeffefff"
        );
        assert_eq!(eval(Op::Div, "0x8f", "0x10")?, "0x8\n0xf");
        assert_eq!(eval(Op::Cmp, "-0xffff", "0xfffe")?, "-1");
        assert_eq!(eval(Op::Cmp, "0x0", "-0x0")?, "0");

        Ok(())
    }

    #[test]
    fn test_evaluate_div_by_zero() {
        assert!(eval(Op::Div, "0x8f", "0x0").is_err());
    }

    #[test]
    fn test_parse_args() {
        let argv = ["bigcalc", "-f", "-o", "out.txt", "sub", "-0x5", "+0x7"];
        let args = Args::try_parse_from(argv).unwrap();
        assert!(matches!(args.op, Op::Sub));
        assert_eq!(args.lhs, "-0x5");
        assert_eq!(args.rhs, "+0x7");
        assert_eq!(args.output, "out.txt");
        assert!(args.force);
    }
}
