//! `tablekit` — inspect and edit persisted table block JSON from the
//! shell, without an editor host.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tablekit_block::convert;
use tablekit_block::wire::{ColSpec, Settings, TableBlock};
use tablekit_cli::exit_codes::*;
use tablekit_cli::ops::{self, Op};
use tablekit_cli::render;
use tablekit_controller::config::TableConfig;
use tablekit_controller::resize::ColumnWidths;
use tablekit_model::grid::Grid;
use tablekit_model::verify;

#[derive(Parser)]
#[command(name = "tablekit", version)]
#[command(about = "Inspect and edit table block JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new empty table block
    #[command(after_help = "Examples:\n  \
        tablekit new -o table.json\n  \
        tablekit new --rows 4 --cols 3 --no-border")]
    New {
        #[arg(long, default_value_t = TableConfig::default().rows)]
        rows: usize,
        #[arg(long, default_value_t = TableConfig::default().cols)]
        cols: usize,
        /// Omit the outer border
        #[arg(long)]
        no_border: bool,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Load a block, report repairs, and verify grid invariants
    Check {
        input: PathBuf,
        /// Exit 3 when the block needed repairs to load
        #[arg(long)]
        strict: bool,
    },
    /// Render a block as an ASCII table
    Show { input: PathBuf },
    /// Replay a JSON array of ops against a block
    #[command(after_help = "Examples:\n  \
        tablekit apply table.json --ops ops.json -o out.json\n  \
        echo '[{\"op\":\"insert_row\",\"index\":1}]' | tablekit apply table.json --in-place")]
    Apply {
        input: PathBuf,
        /// Ops file; stdin when omitted
        #[arg(long)]
        ops: Option<PathBuf>,
        /// Write here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write the result back over the input file
        #[arg(long, conflicts_with = "output")]
        in_place: bool,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::New {
            rows,
            cols,
            no_border,
            output,
        } => cmd_new(rows, cols, no_border, output.as_deref()),
        Commands::Check { input, strict } => cmd_check(&input, strict),
        Commands::Show { input } => cmd_show(&input),
        Commands::Apply {
            input,
            ops,
            output,
            in_place,
        } => cmd_apply(&input, ops.as_deref(), output.as_deref(), in_place),
    };
    ExitCode::from(code)
}

// ===== command bodies =====

fn cmd_new(rows: usize, cols: usize, no_border: bool, output: Option<&Path>) -> u8 {
    let config = TableConfig::default();
    let grid = Grid::new(rows.max(1), cols.max(1));
    let widths = ColumnWidths::new(
        grid.column_count(),
        config.column_width,
        config.min_column_width,
    );
    let block = convert::to_block(
        &grid,
        widths.to_colgroup(),
        Settings {
            with_border: !no_border,
        },
    );
    match write_block(&block, output) {
        Ok(()) => EXIT_SUCCESS,
        Err(code) => code,
    }
}

fn cmd_check(input: &Path, strict: bool) -> u8 {
    let block = match load_block(input) {
        Ok(block) => block,
        Err(code) => return code,
    };
    let (grid, repairs) = convert::from_block(&block);

    for repair in &repairs {
        println!("repair: {}", repair);
    }
    if let Err(violation) = verify::check(&grid) {
        eprintln!("error: repaired grid is still invalid: {}", violation);
        return EXIT_CHECK_INVALID;
    }

    println!("{} | {} repair(s)", render::summary(&grid), repairs.len());
    if strict && !repairs.is_empty() {
        return EXIT_CHECK_REPAIRED;
    }
    EXIT_SUCCESS
}

fn cmd_show(input: &Path) -> u8 {
    let block = match load_block(input) {
        Ok(block) => block,
        Err(code) => return code,
    };
    let (grid, repairs) = convert::from_block(&block);
    if !repairs.is_empty() {
        eprintln!("note: block needed {} repair(s) to load", repairs.len());
    }
    println!("{}", render::summary(&grid));
    print!("{}", render::render(&grid));
    EXIT_SUCCESS
}

fn cmd_apply(input: &Path, ops_path: Option<&Path>, output: Option<&Path>, in_place: bool) -> u8 {
    let block = match load_block(input) {
        Ok(block) => block,
        Err(code) => return code,
    };
    let had_colgroup = !block.colgroup.is_empty();
    let (mut grid, repairs) = convert::from_block(&block);
    if !repairs.is_empty() {
        eprintln!("note: block needed {} repair(s) to load", repairs.len());
    }

    let config = TableConfig::default();
    let mut widths = if had_colgroup {
        ColumnWidths::from_colgroup(&block.colgroup, config.column_width, config.min_column_width)
    } else {
        ColumnWidths::new(
            grid.column_count(),
            config.column_width,
            config.min_column_width,
        )
    };

    let ops = match load_ops(ops_path) {
        Ok(ops) => ops,
        Err(code) => return code,
    };
    if let Err(err) = ops::apply_all(&mut grid, &mut widths, config.column_width, &ops) {
        eprintln!("error: {}", err);
        return EXIT_APPLY_REJECTED;
    }

    // A block saved without a colgroup stays without one.
    let colgroup: Vec<ColSpec> = if had_colgroup {
        widths.to_colgroup()
    } else {
        Vec::new()
    };
    let result = convert::to_block(&grid, colgroup, block.settings);
    let target = if in_place { Some(input) } else { output };
    match write_block(&result, target) {
        Ok(()) => EXIT_SUCCESS,
        Err(code) => code,
    }
}

// ===== shared IO =====

fn load_block(path: &Path) -> Result<TableBlock, u8> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("error: cannot read {}: {}", path.display(), e);
        EXIT_IO
    })?;
    serde_json::from_str(&text).map_err(|e| {
        eprintln!("error: {} is not a table block: {}", path.display(), e);
        EXIT_PARSE
    })
}

fn load_ops(path: Option<&Path>) -> Result<Vec<Op>, u8> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            eprintln!("error: cannot read {}: {}", path.display(), e);
            EXIT_IO
        })?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).map_err(|e| {
                eprintln!("error: cannot read stdin: {}", e);
                EXIT_IO
            })?;
            buf
        }
    };
    serde_json::from_str(&text).map_err(|e| {
        eprintln!("error: not a JSON array of ops: {}", e);
        EXIT_APPLY_BAD_OPS
    })
}

fn write_block(block: &TableBlock, output: Option<&Path>) -> Result<(), u8> {
    let json = match serde_json::to_string_pretty(block) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("error: cannot serialize block: {}", e);
            return Err(EXIT_ERROR);
        }
    };
    match output {
        Some(path) => std::fs::write(path, json + "\n").map_err(|e| {
            eprintln!("error: cannot write {}: {}", path.display(), e);
            EXIT_IO
        }),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}
