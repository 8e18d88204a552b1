#[cfg(windows)]
fn main() {
    use ddc_broadcast::power;

    let ok = match std::env::args().nth(1).as_deref() {
        Some("standby") => power::set_monitors_standby(),
        _ => power::set_monitors_on(),
    };
    std::process::exit(if ok { 0 } else { 1 })
}

#[cfg(not(windows))]
fn main() {
    eprintln!("monitor power control is only available on Windows");
}
