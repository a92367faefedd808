use std::{
    io::{self, Write},
    sync::{
        mpsc::{self, Receiver, RecvTimeoutError},
        Arc, Mutex, MutexGuard,
    },
    thread,
    time::Duration,
};

use chrono::Local;
use clap::Parser;
use flight_path_sim::{
    config::Config, Airport, AirportTable, Frame, Renderer, RouteTable, SimError, Simulation,
    TickOutcome, Timer,
};
use logger::Logger;

const INPUT_POLL_MILLIS: u64 = 50;

fn clean_scr() {
    print!("\x1B[2J\x1B[1;1H");
    io::stdout().flush().ok();
}

/// Prints each frame as one status line.
struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), SimError> {
        let mut stdout = io::stdout();
        write!(
            stdout,
            "\r{:<12} {:>10.5} {:>11.5}   center {}  zoom {}  pitch {}  bearing {}   ",
            "Position:",
            frame.position.latitude,
            frame.position.longitude,
            frame.camera.center,
            frame.camera.zoom,
            frame.camera.pitch,
            frame.camera.bearing
        )
        .and_then(|_| stdout.flush())
        .map_err(|e| SimError::RenderError(e.to_string()))
    }

    fn arrived(&mut self, destination: &Airport) -> Result<(), SimError> {
        println!(
            "\nYou have reached your destination: {}",
            destination.display_name()
        );
        Ok(())
    }
}

/// Lines typed by the user, read on a background thread so a running
/// simulation can be interrupted.
struct Input {
    lines: Receiver<String>,
}

impl Input {
    fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let stdin = io::stdin();
            loop {
                let mut buffer = String::new();
                match stdin.read_line(&mut buffer) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        if tx.send(buffer.trim().to_string()).is_err() {
                            break;
                        }
                    }
                }
            }
        });
        Input { lines: rx }
    }

    fn prompt(&self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        io::stdout().flush().ok();
        self.lines.recv().ok()
    }
}

fn lock(sim: &Mutex<Simulation>) -> Result<MutexGuard<'_, Simulation>, SimError> {
    sim.lock()
        .map_err(|_| SimError::LockError("Failed to lock the simulation".to_string()))
}

fn list_airports(sim: &Mutex<Simulation>, filter: &str) -> Result<(), SimError> {
    let sim = lock(sim)?;
    let mut found = false;
    println!("\n{:<10} {:<50} {:>10} {:>11}", "IATA Code", "Airport", "Latitude", "Longitude");
    for airport in sim.airports().search(filter) {
        found = true;
        println!(
            "{:<10} {:<50} {:>10.4} {:>11.4}",
            airport.iata_code,
            airport.display_name(),
            airport.position.latitude,
            airport.position.longitude
        );
    }
    if !found {
        println!("No airports available.");
    }
    Ok(())
}

fn select_route(sim: &Mutex<Simulation>, input: &Input) -> Result<(), SimError> {
    clean_scr();
    let origin = input
        .prompt("Choose your departure airport (name or IATA code): ")
        .ok_or(SimError::InvalidInput)?;
    let destination = input
        .prompt("Choose your destination airport (name or IATA code): ")
        .ok_or(SimError::InvalidInput)?;

    lock(sim)?.select(&origin, &destination)?;
    show_info(sim)
}

fn random_route(sim: &Mutex<Simulation>) -> Result<(), SimError> {
    lock(sim)?.select_random(&mut rand::thread_rng())?;
    show_info(sim)
}

fn show_info(sim: &Mutex<Simulation>) -> Result<(), SimError> {
    let sim = lock(sim)?;
    let selection = sim.selection().ok_or(SimError::NoRouteSelected)?;
    let camera = sim.camera()?;

    println!("From:      {}", selection.origin.display_name());
    println!("To:        {}", selection.destination.display_name());
    println!(
        "Distance:  {} Miles ({} km)",
        selection.distance.miles, selection.distance.km
    );
    match selection.duration {
        Some(duration) => println!(
            "The average flight time from {} to {} is {}",
            selection.origin.iata_code, selection.destination.iata_code, duration
        ),
        None => println!("Note: There are no direct flights between the selected airports."),
    }
    println!(
        "Camera:    center {}  zoom {}  pitch {}  bearing {}",
        camera.center, camera.zoom, camera.pitch, camera.bearing
    );
    Ok(())
}

fn set_pitch(sim: &Mutex<Simulation>, input: &Input) -> Result<(), SimError> {
    let value = input.prompt("Enter the angle (0-60): ").ok_or(SimError::InvalidInput)?;
    let pitch: u8 = value.parse().map_err(|_| SimError::InvalidInput)?;
    lock(sim)?.set_pitch(pitch)
}

fn set_bearing(sim: &Mutex<Simulation>, input: &Input) -> Result<(), SimError> {
    let value = input
        .prompt("Enter the orientation (0-360): ")
        .ok_or(SimError::InvalidInput)?;
    let bearing: u16 = value.parse().map_err(|_| SimError::InvalidInput)?;
    lock(sim)?.set_bearing(bearing)
}

fn set_time_rate(timer: &Timer, input: &Input) -> Result<(), SimError> {
    let value = input
        .prompt("Enter the time between ticks (in milliseconds): ")
        .ok_or(SimError::InvalidInput)?;
    let millis: u64 = value.parse().map_err(|_| SimError::InvalidInput)?;
    timer.set_interval(millis)
}

/// Flies the selected route one tick per timer callback until arrival or
/// until the user presses Enter.
fn simulate(sim: &Arc<Mutex<Simulation>>, timer: &Arc<Timer>, input: &Input) -> Result<(), SimError> {
    {
        let mut guard = lock(sim)?;
        if let Err(e) = guard.start() {
            // Without a direct flight the origin is drawn once, standing still.
            guard.tick(&mut ConsoleRenderer)?;
            println!();
            return Err(e);
        }
    }
    println!("Press Enter to stop the simulation\n");

    let sim_in_timer = Arc::clone(sim);
    let mut renderer = ConsoleRenderer;
    let handle = Arc::clone(timer).start(move |_tick| {
        let Ok(mut sim) = sim_in_timer.lock() else {
            return false;
        };
        match sim.tick(&mut renderer) {
            Ok(TickOutcome::Advanced(_)) => true,
            Ok(_) => false,
            Err(e) => {
                eprintln!("\n{}", e);
                false
            }
        }
    })?;

    loop {
        if handle.is_finished() {
            break;
        }
        match input.lines.recv_timeout(Duration::from_millis(INPUT_POLL_MILLIS)) {
            Ok(_) => {
                timer.stop();
                lock(sim)?.cancel()?;
                println!("\nSimulation stopped");
                break;
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                timer.stop();
                break;
            }
        }
    }

    handle
        .join()
        .map_err(|_| SimError::Other("Timer thread panicked".to_string()))
}

fn print_help() {
    clean_scr();
    println!("Available commands:");
    println!("  list-airports [filter]");
    println!("    Show the airports whose name contains the filter.");
    println!("  select");
    println!("    Choose the departure and destination airports.");
    println!("  random-route");
    println!("    Pick a random route with a direct flight.");
    println!("  info");
    println!("    Show distance, average flight time and camera of the selected route.");
    println!("  pitch");
    println!("    Change the map angle (0-60).");
    println!("  bearing");
    println!("    Change the map orientation (0-360).");
    println!("  time-rate");
    println!("    Change the time between simulation ticks.");
    println!("  simulate");
    println!("    Simulate the flight path of the selected route.");
    println!("  exit");
    println!("    Closes this application.");
}

fn main() -> Result<(), SimError> {
    let config = Config::parse();

    let airports = AirportTable::from_path(&config.airports)?;
    let routes = RouteTable::from_path(&config.routes)?;

    let logger = match &config.log_dir {
        Some(dir) => {
            let session = Local::now().format("%Y%m%d_%H%M%S").to_string();
            Some(
                Logger::new(dir, &session)?
                    .with_min_level(config.log_level)
                    .with_console(config.log_console),
            )
        }
        None => None,
    };
    if let Some(logger) = &logger {
        logger.info(&format!(
            "Loaded {} airports and {} routes",
            airports.len(),
            routes.len()
        ))?;
    }

    println!(
        "Loaded {} airports and {} direct routes",
        airports.len(),
        routes.len()
    );

    let sim = Arc::new(Mutex::new(Simulation::new(
        airports,
        routes,
        config.trajectory()?,
        config.view()?,
        logger,
    )));
    let timer = Timer::new(config.tick_millis)?;
    let input = Input::spawn();

    loop {
        let Some(command) = input.prompt("Enter command (type '-h' or '--help' for options): ")
        else {
            break;
        };

        let args: Vec<&str> = command.split_whitespace().collect();
        if args.is_empty() {
            continue;
        }

        let result = match args[0] {
            "list-airports" => list_airports(&sim, &args[1..].join(" ")),
            "select" => select_route(&sim, &input),
            "random-route" => random_route(&sim),
            "info" => show_info(&sim),
            "pitch" => set_pitch(&sim, &input),
            "bearing" => set_bearing(&sim, &input),
            "time-rate" => set_time_rate(&timer, &input),
            "simulate" => simulate(&sim, &timer, &input),
            "-h" | "--help" | "help" => {
                print_help();
                Ok(())
            }
            "exit" => break,
            _ => {
                eprintln!("Invalid command. Use -h for help.");
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("{}", e);
        }
    }

    timer.stop();
    Ok(())
}
