use grid_route::{find_path, PathingGrid, Point, SearchMode};

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have a 4-neighborhood. Run with RUST_LOG=debug to see the search records.

fn main() {
    env_logger::init();
    let mut pathing_grid = PathingGrid::new(3, 3, false);
    pathing_grid
        .set(Point::new(1, 1), true)
        .expect("(1, 1) is on a 3x3 grid");
    println!("{}", pathing_grid);
    let start = Point::new(0, 0);
    let end = Point::new(2, 2);
    for mode in [SearchMode::Bfs, SearchMode::Astar] {
        match find_path(&pathing_grid, Some(start), Some(end), mode) {
            Ok(result) => println!("{mode}: {result}"),
            Err(err) => println!("{mode}: {err}"),
        }
    }
}
