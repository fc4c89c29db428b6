use grid_route::{find_path, parse_map, SearchMode};
use std::{env, fs, process};

// Reads a text map (default: a built-in maze), finds a route between its S and E cells and
// prints the map with the route drawn in.
//
//     cargo run --example text_map -- [MAP_FILE] [bfs|astar]

const MAZE: &str = "\
S...#.......
.##.#.####..
.#..#....#..
.#.####..#.#
.#......##..
.######.#..#
......#...#E
";

fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().skip(1).collect();
    let map = match args.first() {
        Some(path) => fs::read_to_string(path).unwrap_or_else(|err| {
            eprintln!("could not read {path}: {err}");
            process::exit(1);
        }),
        None => MAZE.to_owned(),
    };
    let mode: SearchMode = match args.get(1).map(|m| m.parse()) {
        Some(Ok(mode)) => mode,
        Some(Err(err)) => {
            eprintln!("{err}");
            process::exit(1);
        }
        None => SearchMode::Astar,
    };

    let parsed = match parse_map(&map) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };
    match find_path(&parsed.grid, parsed.start, parsed.end, mode) {
        Ok(result) => match result.path() {
            Some(path) => {
                print!("{}", parsed.grid.render_path(path));
                println!("{mode}: {} cells", path.len());
            }
            None => println!("{mode}: {result}"),
        },
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}
