use simplex_api_sdk::{Cell, Operator, ProblemBuilder, ProblemType, SimplexClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create a client (adjust URL as needed)
    let client = SimplexClient::new("http://127.0.0.1:8000")?;

    // Max Z = 3x1 + 5x2
    //   x1        <= 4
    //        2x2  <= 12
    //   3x1 + 2x2 <= 18
    // Expected: x1 = 2, x2 = 6, Z = 36
    let payload = ProblemBuilder::new()
        .problem_type(ProblemType::Maximization)
        .objective(vec![3.0, 5.0])
        .constraint(vec![1.0, 0.0], Operator::LessEqual, 4.0)
        .constraint(vec![0.0, 2.0], Operator::LessEqual, 12.0)
        .constraint(vec![3.0, 2.0], Operator::LessEqual, 18.0)
        .build()?;

    println!("\n📊 Solving linear programming problem...\n");

    let response = client.solve(&payload).await?;
    let result = &response.result;

    println!("Status: {}", result.status);
    if let Some(ref solution) = result.solucion {
        match solution.valor_optimo {
            Some(z) => println!("Optimal value: {:.2}", z),
            None => println!("Optimal value: N/A"),
        }
        for var in solution.variables.decision(payload.num_variables()) {
            println!("  {} = {:.2}", var.name, var.value);
        }
    }

    println!("\n✓ Received {} table(s)\n", result.tablas.len());
    for table in &result.tablas {
        println!("{}", table.titulo);
        println!("  {}", table.headers.join(" | "));
        for row in table.filas.iter().chain(std::iter::once(&table.fila_obj)) {
            let cells: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Cell::Number(n) => format!("{:.3}", n),
                    Cell::Label(s) => s.clone(),
                })
                .collect();
            println!("  {}", cells.join(" | "));
        }
    }

    if payload.is_two_dimensional() {
        let html = client.fetch_graph(&payload).await?;
        println!("\nGraph document: {} bytes", html.len());
    }

    Ok(())
}
