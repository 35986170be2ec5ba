use anyhow::Result;
use infer::portable::{infer, Args};
use structopt::StructOpt;

fn main() -> Result<()> {
    pretty_env_logger::init();
    infer(Args::from_args())
}
