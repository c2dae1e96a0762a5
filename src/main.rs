//! blockbridge - HTML ⇄ block tree converter

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use blockbridge::util::{decode_text, extract_meta_charset};
use blockbridge::{
    BlockNode, ConvertConfig, Converter, HandlerRegistry, MarkupOptions, Result, VerbatimHandler,
};

#[derive(Parser)]
#[command(name = "blockbridge")]
#[command(version, about = "Convert HTML to block trees and back", long_about = None)]
#[command(after_help = "EXAMPLES:
    blockbridge html2blocks page.html -o page.json       HTML to block JSON
    blockbridge html2blocks page.html --markup           HTML to block markup
    blockbridge blocks2html page.json                    Block JSON to HTML
    cat page.txt | blockbridge blocks2html --markup      Block markup to HTML")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Attribute holding the block identity label
    #[arg(long, global = true, value_name = "NAME")]
    identity_attr: Option<String>,

    /// Block name used in block markup markers
    #[arg(long, global = true, value_name = "NAME")]
    block_name: Option<String>,

    /// Keep the whole sub-tree of TAG as raw HTML (repeatable)
    #[arg(long = "verbatim-tag", global = true, value_name = "TAG")]
    verbatim_tags: Vec<String>,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Parse HTML into a block tree
    #[command(name = "html2blocks")]
    HtmlToBlocks {
        #[command(flatten)]
        args: IoArgs,

        /// Pretty-print is the default; write compact JSON instead
        #[arg(long, conflicts_with = "markup")]
        compact: bool,
    },
    /// Render a block tree back to HTML
    #[command(name = "blocks2html")]
    BlocksToHtml {
        #[command(flatten)]
        args: IoArgs,

        /// Render empty non-void elements as `<tag />`
        #[arg(long)]
        self_close_empty: bool,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Input file, or `-` for stdin
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Block trees are comment-delimited markup instead of JSON
    #[arg(long)]
    markup: bool,

    /// Markup escapes carry doubled backslashes
    #[arg(long, requires = "markup")]
    double_escape: bool,
}

impl IoArgs {
    fn markup_options(&self) -> MarkupOptions {
        MarkupOptions {
            double_escape: self.double_escape,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(quiet: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if quiet {
        builder.filter_level(log::LevelFilter::Error);
    }
    builder.init();
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::HtmlToBlocks { args, compact } => {
            let converter = build_converter(cli, false);
            let bytes = read_input(args.input.as_ref())?;
            let html = decode_text(&bytes, extract_meta_charset(&bytes));

            let blocks = converter.html_to_blocks(&html)?;
            log::info!("parsed {} top-level blocks", blocks.len());

            let mut text = if args.markup {
                converter.blocks_to_markup(&blocks, args.markup_options())?
            } else if *compact {
                serde_json::to_string(&blocks)?
            } else {
                serde_json::to_string_pretty(&blocks)?
            };
            text.push('\n');
            write_output(args.output.as_ref(), &text)
        }
        Command::BlocksToHtml {
            args,
            self_close_empty,
        } => {
            let converter = build_converter(cli, *self_close_empty);
            let bytes = read_input(args.input.as_ref())?;
            let text = decode_text(&bytes, None);

            let blocks: Vec<BlockNode> = if args.markup {
                converter.markup_to_blocks(&text, args.markup_options())?
            } else {
                serde_json::from_str(&text)?
            };
            log::info!("rendering {} top-level blocks", blocks.len());

            let mut html = converter.blocks_to_html(&blocks)?;
            html.push('\n');
            write_output(args.output.as_ref(), &html)
        }
    }
}

fn build_converter(cli: &Cli, self_close_empty: bool) -> Converter {
    let mut config = ConvertConfig::new().with_self_close_empty(self_close_empty);
    if let Some(name) = &cli.identity_attr {
        config = config.with_identity_attr(name);
    }
    if let Some(name) = &cli.block_name {
        config = config.with_block_name(name);
    }

    let registry = cli
        .verbatim_tags
        .iter()
        .fold(HandlerRegistry::builder(), |builder, tag| {
            builder.register(tag, VerbatimHandler)
        })
        .build();

    Converter::new(config, registry)
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) if path.as_os_str() != "-" => Ok(fs::read(path)?),
        _ => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&PathBuf>, text: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, text)?,
        None => io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}
