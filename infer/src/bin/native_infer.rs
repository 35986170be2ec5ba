use anyhow::Result;
use infer::native::{infer, Args};
use structopt::StructOpt;

fn main() -> Result<()> {
    pretty_env_logger::init();
    infer(Args::from_args())
}
