use clap::Parser;
use log::info;
use scacchiera::perft::{apply, divide, perft, MoveCode};
use scacchiera::{Board, Color};

#[derive(Parser, Debug)]
#[command(author, version, about = "Counts legal move tree leaves", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 3)]
    depth: u32,

    /// Moves played from the initial position first, e.g. "1434,6444"
    #[arg(short, long, value_delimiter = ',')]
    moves: Vec<MoveCode>,

    /// Print the node count of every root move
    #[arg(long)]
    divide: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    scacchiera::init();

    let mut board = Board::initial();
    let mut side = Color::White;
    for code in &args.moves {
        apply(&mut board, *code)?;
        info!("{side} played {code}");
        side = side.opposite();
    }

    println!("{board}");
    println!("Running perft for {side} at depth {}", args.depth);

    let start = std::time::Instant::now();
    let nodes = if args.divide {
        let split = divide(&board, side, args.depth);
        for (code, count) in &split {
            println!("{code}: {count}");
        }
        split.iter().map(|(_, count)| count).sum()
    } else {
        perft(&board, side, args.depth)
    };
    let duration = start.elapsed();

    println!(
        "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
        args.depth,
        nodes,
        duration.as_millis(),
        nodes as f64 / (duration.as_micros().max(1) as f64)
    );
    Ok(())
}
