mod commands;
mod config;

use std::path::PathBuf;

use bpaf::Bpaf;
use dvbnet_ctl::{Controller, DvbDevices, Encapsulation, SocketLinks};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::config::Config;

#[derive(Bpaf, Clone, Debug)]
struct AdapterArgs {
    /// DVB adapter number, defaults to the configured one
    #[bpaf(long, argument("N"))]
    adapter: Option<u8>,

    /// Net device number on the adapter, defaults to the configured one
    #[bpaf(long, argument("M"))]
    net: Option<u8>,
}

#[derive(Bpaf, Clone, Debug)]
enum Command {
    /// Define a network interface on the adapter
    #[bpaf(command("add"))]
    Add {
        #[bpaf(external(adapter_args))]
        target: AdapterArgs,

        /// Packet identifier of the stream carrying the IP traffic
        #[bpaf(long, argument("PID"))]
        pid: u16,

        /// Encapsulation of the IP traffic: mpe or ule
        #[bpaf(long, argument("mpe|ule"))]
        encaps: Encapsulation,
    },

    /// Bring a network interface down and remove it from the adapter
    #[bpaf(command("remove"))]
    Remove {
        #[bpaf(external(adapter_args))]
        target: AdapterArgs,

        /// Interface number
        #[bpaf(long("if"), argument("IF"))]
        if_num: u16,
    },

    /// List the network interfaces of the adapter
    #[bpaf(command("list"))]
    List {
        #[bpaf(external(adapter_args))]
        target: AdapterArgs,
    },

    /// Set the IPv4 address of a network device
    #[bpaf(command("set-ip"))]
    SetIp {
        #[bpaf(long("if-name"), argument("NAME"))]
        if_name: String,

        #[bpaf(long, argument("A.B.C.D"))]
        ip: String,
    },

    /// Set the hardware address of a network device
    #[bpaf(command("set-mac"))]
    SetMac {
        #[bpaf(long("if-name"), argument("NAME"))]
        if_name: String,

        #[bpaf(long, argument("AA:BB:CC:DD:EE:FF"))]
        mac: String,
    },

    /// Bring a network device up
    #[bpaf(command("up"))]
    Up {
        #[bpaf(long("if-name"), argument("NAME"))]
        if_name: String,
    },

    /// Bring a network device down
    #[bpaf(command("down"))]
    Down {
        #[bpaf(long("if-name"), argument("NAME"))]
        if_name: String,
    },
}

#[derive(Bpaf, Clone, Debug)]
#[bpaf(options, version)]
struct Options {
    /// Perform verbose logging
    #[bpaf(short, long)]
    verbose: bool,

    /// Path to the config file
    #[bpaf(short, long, argument("PATH"))]
    config: Option<PathBuf>,

    #[bpaf(external(command))]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let options = options().run();

    let env_filter = EnvFilter::builder()
        .with_default_directive(
            match options.verbose {
                true => LevelFilter::TRACE,
                _ => LevelFilter::INFO,
            }
            .into(),
        )
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .init();

    let config = Config::load(options.config.as_deref())?;
    let device = &config.device;

    let controller = Controller::new(DvbDevices::new(device.root.clone()), SocketLinks)
        .with_removal_grace(config.interfaces.removal_grace())
        .with_max_interfaces(config.interfaces.max);

    match options.command {
        Command::Add {
            target,
            pid,
            encaps,
        } => commands::add(
            &controller,
            device.adapter_ref(target.adapter, target.net),
            pid,
            encaps,
        ),
        Command::Remove { target, if_num } => commands::remove(
            &controller,
            device.adapter_ref(target.adapter, target.net),
            if_num,
        ),
        Command::List { target } => {
            commands::list(&controller, device.adapter_ref(target.adapter, target.net))
        }
        Command::SetIp { if_name, ip } => Ok(controller.set_ip(&if_name, &ip)?),
        Command::SetMac { if_name, mac } => Ok(controller.set_mac(&if_name, &mac)?),
        Command::Up { if_name } => Ok(controller.set_link(&if_name, true)?),
        Command::Down { if_name } => Ok(controller.set_link(&if_name, false)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Options {
        options().run_inner(args).unwrap()
    }

    #[test]
    fn test_parse_add() {
        let options = parse(&["add", "--adapter", "1", "--pid", "512", "--encaps", "ule"]);

        match options.command {
            Command::Add {
                target,
                pid,
                encaps,
            } => {
                assert_eq!(target.adapter, Some(1));
                assert_eq!(target.net, None);
                assert_eq!(pid, 512);
                assert_eq!(encaps, Encapsulation::Ule);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_remove() {
        let options = parse(&["-v", "remove", "--net", "2", "--if", "3"]);
        assert!(options.verbose);

        match options.command {
            Command::Remove { target, if_num } => {
                assert_eq!(target.adapter, None);
                assert_eq!(target.net, Some(2));
                assert_eq!(if_num, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_address_commands() {
        let options = parse(&["set-mac", "--if-name", "dvb0_0", "--mac", "00:01:02:03:04:05"]);
        assert!(matches!(
            options.command,
            Command::SetMac { ref if_name, ref mac } if if_name == "dvb0_0" && mac == "00:01:02:03:04:05"
        ));

        let options = parse(&["set-ip", "--if-name", "dvb0_1", "--ip", "not-an-ip"]);
        assert!(matches!(options.command, Command::SetIp { ref ip, .. } if ip == "not-an-ip"));

        let options = parse(&["down", "--if-name", "dvb0_1"]);
        assert!(matches!(options.command, Command::Down { .. }));
    }

    #[test]
    fn test_reject_bad_arguments() {
        let args: &[&[&str]] = &[
            &["add", "--pid", "512", "--encaps", "gse"],
            &["add", "--pid", "70000", "--encaps", "mpe"],
            &["add", "--encaps", "mpe"],
            &["remove", "--if", "x"],
            &["set-ip", "--ip", "10.1.1.1"],
        ];

        for args in args {
            assert!(options().run_inner(*args).is_err(), "{args:?} should be rejected");
        }
    }

    #[test]
    fn check_options() {
        options().check_invariants(false);
    }
}
