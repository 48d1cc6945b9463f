use anyhow::{Context, Result};
use colored::*;
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{self, Write};

#[derive(Debug, Deserialize)]
struct User {
    id: i64,
    email: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct Route {
    route_date: String,
    point_count: i64,
    start_time: String,
    end_time: String,
}

#[derive(Debug, Deserialize)]
struct Point {
    id: i64,
    latitude: f64,
    longitude: f64,
    recorded_at: String,
    accuracy: Option<f64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🗺️ Route Editor Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    // Paso 1: URL del editor
    let base_url = prompt("URL del editor [http://localhost:5000]: ")?;
    let base_url = if base_url.is_empty() {
        "http://localhost:5000".to_string()
    } else {
        base_url.trim_end_matches('/').to_string()
    };

    let client = reqwest::Client::new();

    // Paso 2: Healthcheck
    check_health(&client, &base_url).await?;

    // Paso 3: Menú principal
    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 👥 Listar usuarios");
        println!("2. 🛣️ Listar rutas de un usuario");
        println!("3. 📍 Ver puntos de una ruta");
        println!("4. ➕ Añadir punto a una ruta");
        println!("5. 🗑️ Borrar punto");
        println!("6. 🚪 Salir");

        let choice = prompt("Selecciona una opción (1-6): ")?;

        let result = match choice.as_str() {
            "1" => list_users(&client, &base_url).await,
            "2" => list_routes(&client, &base_url).await,
            "3" => show_points(&client, &base_url).await,
            "4" => add_point(&client, &base_url).await,
            "5" => delete_point(&client, &base_url).await,
            "6" => {
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("{} {:#}", "❌ Error:".bright_red().bold(), e);
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

fn prompt_i64(label: &str) -> Result<i64> {
    let raw = prompt(label)?;
    raw.parse().with_context(|| format!("'{}' no es un número entero", raw))
}

fn prompt_f64(label: &str) -> Result<f64> {
    let raw = prompt(label)?;
    raw.parse().with_context(|| format!("'{}' no es un número", raw))
}

async fn check_health(client: &reqwest::Client, base_url: &str) -> Result<()> {
    println!();
    println!("{}", "🩺 COMPROBANDO /health...".bright_cyan().bold());

    let response = client
        .get(format!("{}/health", base_url))
        .send()
        .await
        .with_context(|| format!("No se pudo conectar con {}", base_url))?;
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        println!("{} {}", "✅ Editor sano:".bright_green(), body);
    } else {
        println!("{} {} {}", "⚠️ Editor no sano:".bright_red(), status, body);
    }
    Ok(())
}

/// Mostrar el cuerpo crudo cuando la API responde con error
async fn expect_success(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);
    if !status.is_success() {
        anyhow::bail!("HTTP {} -> {}", status, serde_json::to_string_pretty(&body)?);
    }
    Ok(body)
}

async fn list_users(client: &reqwest::Client, base_url: &str) -> Result<()> {
    let body = expect_success(client.get(format!("{}/api/users", base_url)).send().await?).await?;
    let users: Vec<User> = serde_json::from_value(body)?;

    println!("{}", format!("👥 {} usuarios", users.len()).bright_blue().bold());
    for user in users {
        println!("  {:>5}  {}  <{}>", user.id, user.display_name, user.email);
    }
    Ok(())
}

async fn list_routes(client: &reqwest::Client, base_url: &str) -> Result<()> {
    let user_id = prompt_i64("User ID: ")?;
    let days = prompt("Días hacia atrás [30]: ")?;
    let days = if days.is_empty() { "30".to_string() } else { days };

    let url = format!("{}/api/users/{}/routes?days={}", base_url, user_id, days);
    let body = expect_success(client.get(url).send().await?).await?;
    let routes: Vec<Route> = serde_json::from_value(body)?;

    println!("{}", format!("🛣️ {} rutas", routes.len()).bright_blue().bold());
    for route in routes {
        println!(
            "  {}  {:>4} puntos  {} → {}",
            route.route_date, route.point_count, route.start_time, route.end_time
        );
    }
    Ok(())
}

async fn show_points(client: &reqwest::Client, base_url: &str) -> Result<()> {
    let user_id = prompt_i64("User ID: ")?;
    let route_date = prompt("Fecha (YYYY-MM-DD): ")?;

    let url = format!("{}/api/users/{}/routes/{}/points", base_url, user_id, route_date);
    let body = expect_success(client.get(url).send().await?).await?;
    let points: Vec<Point> = serde_json::from_value(body)?;

    println!("{}", format!("📍 {} puntos", points.len()).bright_blue().bold());
    for point in points {
        let accuracy = point
            .accuracy
            .map(|a| format!("{:.0}m", a))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "  {:>8}  {}  ({:.6}, {:.6})  ±{}",
            point.id, point.recorded_at, point.latitude, point.longitude, accuracy
        );
    }
    Ok(())
}

async fn add_point(client: &reqwest::Client, base_url: &str) -> Result<()> {
    let user_id = prompt_i64("User ID: ")?;
    let route_date = prompt("Fecha (YYYY-MM-DD): ")?;
    let latitude = prompt_f64("Latitud: ")?;
    let longitude = prompt_f64("Longitud: ")?;

    let payload = json!({
        "latitude": latitude,
        "longitude": longitude,
        "accuracy": 20
    });

    println!("{}", "📦 Payload:".bright_blue());
    println!("{}", serde_json::to_string_pretty(&payload)?);

    let url = format!("{}/api/users/{}/routes/{}/points", base_url, user_id, route_date);
    let body = expect_success(client.post(url).json(&payload).send().await?).await?;

    println!("{}", "✅ PUNTO AÑADIDO:".bright_green().bold());
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

async fn delete_point(client: &reqwest::Client, base_url: &str) -> Result<()> {
    let user_id = prompt_i64("User ID: ")?;
    let point_id = prompt_i64("Point ID: ")?;

    let url = format!("{}/api/users/{}/points/{}", base_url, user_id, point_id);
    let body = expect_success(client.delete(url).send().await?).await?;

    println!("{}", "✅ PUNTO BORRADO:".bright_green().bold());
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
