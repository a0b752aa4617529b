//! Example: stepping through the LCS table for a classic tutoring exercise.
//!
//! Run with:
//! `cargo run --example walkthrough`

use dp_stepper::{Phase, StepEngine, TableSnapshot};

fn main() {
    let x = "skullandbones";
    let y = "lullabybabies";
    let mut engine = StepEngine::new(x, y).expect("any string is accepted by default");

    println!("x = {x}, y = {y}");
    println!("steps to DONE: {}", engine.max_step_index());

    engine.step_col_init(engine.schedule().col_init_limit()).unwrap();
    println!("\nboundaries written ({}):", engine.state());
    print_table(&engine.snapshot_table(), x, y);

    engine.step_ij_loop(3, 5).unwrap();
    println!(
        "\nafter 3 rows and 5 cells ({}), current value = {:?}",
        engine.state(),
        engine.current_value()
    );
    print_table(&engine.snapshot_table(), x, y);

    for _ in 0..4 {
        engine.step_back().unwrap();
    }
    println!("\nundid 4 steps: {}", engine.state());

    let steps = engine.run_to_end();
    assert_eq!(engine.state().phase, Phase::Done);
    println!("\nran {steps} more steps to DONE:");
    print_table(&engine.snapshot_table(), x, y);
    println!(
        "\nLCS length {}, one LCS: {}",
        engine.lcs_length().unwrap(),
        engine.traceback().unwrap()
    );
}

fn print_table(table: &TableSnapshot, x: &str, y: &str) {
    print!("      ");
    for c in y.chars() {
        print!("{c:>3}");
    }
    println!();
    let labels: Vec<char> = x.chars().collect();
    for row in -1..table.n() as isize {
        let label = if row < 0 { ' ' } else { labels[row as usize] };
        print!("{label:>3}");
        // skip column m, which the loop program never writes past the boundary
        for cell in table.row(row).unwrap_or(&[]).iter().take(table.m() + 1) {
            match cell {
                Some(v) => print!("{v:>3}"),
                None => print!("  ."),
            }
        }
        println!();
    }
}
