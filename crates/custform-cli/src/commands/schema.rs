//! Print the default form

use anyhow::Result;
use clap::Args;
use custform_core::schema::CustomerForm;

#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Print on one line
    #[arg(long)]
    pub compact: bool,
}

pub fn print_schema(args: SchemaArgs) -> Result<()> {
    let value = CustomerForm::new()?.form().value();
    let json = if args.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    println!("{json}");
    Ok(())
}
