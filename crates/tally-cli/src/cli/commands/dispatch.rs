use super::super::args::*;
use crate::exit_codes::SUCCESS;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Update(args) => super::update::run(args),
        Command::Check(args) => super::check::run(args),
        Command::Trend(args) => super::trend::run(args),
        Command::Show(args) => super::show::run(args),
        Command::Snapshot(args) => super::snapshot::run(args),
        Command::Comment(args) => super::comment::run(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}
