//! Startup banner and URL display

use super::config::is_all_interfaces;
use super::constants::APP_NAME;

/// Print the startup banner with URLs
pub fn print_banner(host: &str, port: u16, namespace: &str, known_stats: usize) {
    // Use localhost for display when binding to all interfaces
    let display_host = if is_all_interfaces(host) {
        "localhost"
    } else {
        host
    };

    println!();
    println!(
        "  \x1b[1m\x1b[36m{}\x1b[0m \x1b[90mv{}\x1b[0m",
        APP_NAME,
        env!("CARGO_PKG_VERSION")
    );
    println!();

    const W: usize = 10;

    let metrics_url = format!("http://{}:{}/metrics", display_host, port);
    println!(
        "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
        "Metrics:",
        terminal_link(&metrics_url)
    );
    println!(
        "  \x1b[33m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m http://{}:{}/api/v1/presence",
        "Presence:", display_host, port
    );

    if is_all_interfaces(host)
        && let Ok(interfaces) = local_ip_address::list_afinet_netifas()
    {
        for (_, ip) in interfaces
            .iter()
            .filter(|(_, ip)| ip.is_ipv4() && !ip.is_loopback())
        {
            let network_url = format!("http://{}:{}/metrics", ip, port);
            println!(
                "  \x1b[32m➜\x1b[0m  \x1b[1m{:<W$}\x1b[0m {}",
                "Network:",
                terminal_link(&network_url)
            );
        }
    } else if host == "127.0.0.1" || host == "localhost" {
        println!(
            "  \x1b[90m➜  {:<W$} use --host 0.0.0.0 to expose\x1b[0m",
            "Network:"
        );
    }

    println!(
        "  \x1b[90m➜  {:<W$} {}_* ({} known stats)\x1b[0m",
        "Namespace:", namespace, known_stats
    );
    println!();
}

/// Wrap `url` in an OSC 8 hyperlink when stdout supports it
fn terminal_link(url: &str) -> String {
    if supports_hyperlinks::on(supports_hyperlinks::Stream::Stdout) {
        format!("\x1b]8;;{url}\x07\x1b[36m{url}\x1b[0m\x1b]8;;\x07")
    } else {
        format!("\x1b[36m{url}\x1b[0m")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_link_contains_url() {
        let link = terminal_link("http://localhost:2112/metrics");
        assert!(link.contains("http://localhost:2112/metrics"));
        assert!(link.ends_with("\x1b[0m") || link.ends_with("\x1b]8;;\x07"));
    }
}
