use anyhow::Result;
use tranship_api::{Customer, InitialMethod, Location, SolveOptions, TransportSolver};
use tranship_core::math::Scalar;

fn main() -> Result<()> {
    let locations = vec![
        Location::new("Cleveland", 120, 1.5).with_general_cost(900.0),
        Location::new("Harrisburg", 80, 2.0).with_general_cost(650.0),
        Location::new("Chicago", 150, 1.0).with_general_cost(1200.0),
        Location::new("Trenton", 60, 2.5),
        Location::new("Louisville", 90, 1.25),
    ];
    let customers = vec![
        customer("Pittsburgh", 110, [4.0, 3.0, 6.5, 5.0, 5.5]),
        customer("Indianapolis", 95, [5.0, 7.0, 2.5, 8.0, 2.0]),
        customer("Newark", 70, [6.0, 2.5, 8.0, 1.0, 7.5]),
        customer("Detroit", 85, [2.0, 6.0, 3.0, 7.5, 4.5]),
    ];

    let options = SolveOptions {
        record_history: true,
        ..SolveOptions::default()
    };
    let report = TransportSolver::<Scalar>::new()
        .options(options)
        .initial(InitialMethod::Vogel)
        .solve(&locations, &customers)?;

    println!("status: {}", report.status);
    for row in &report.rows {
        println!("{:<14} {:?} -> {}", row.customer, row.shipments, row.total);
    }
    println!("capacity: {}", report.capacity.label());
    println!("total cost: {:.2} after {} pivots", report.total_cost, report.pivots());
    Ok(())
}

fn customer(name: &str, demand: u64, costs: [Scalar; 5]) -> Customer<Scalar> {
    ["Cleveland", "Harrisburg", "Chicago", "Trenton", "Louisville"]
        .into_iter()
        .zip(costs)
        .fold(Customer::new(name, demand), |customer, (location, cost)| {
            customer.cost(location, cost)
        })
}
