use std::{env, fs, path::PathBuf};

fn main() {
    // 1) Provide memory.x when building for the Pico W (thumbv6m); host
    //    builds need no linker script.
    let target = env::var("TARGET").unwrap();
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    if target.starts_with("thumbv6m") {
        let memory_x = fs::read_to_string("memory.x").expect("Failed to read memory.x");
        let dest = out_dir.join("memory.x");
        fs::write(&dest, memory_x).expect("Failed to write memory.x");
        println!("cargo:rustc-link-search={}", out_dir.display());
        println!("cargo:rerun-if-changed=memory.x");
    }

    // 2) Load optional env files (still supported for convenience)
    let _ = dotenvy::from_filename(".env");
    load_home_env(".pico.env");
    load_home_env(".env");

    // 3) Provide fallbacks so the wifi feature can compile without .env
    let wifi_ssid = env_or_default("WIFI_SSID", "");
    let wifi_pass = env_or_default("WIFI_PASS", "");
    let mqtt_client_id = env_or_default("MQTT_CLIENT_ID", "");
    let mqtt_user = env_or_default("MQTT_USER", "");
    let mqtt_pass = env_or_default("MQTT_PASS", "");
    let channel_id = env_or_default("THINGSPEAK_CHANNEL_ID", "0");

    // Warn only if Wi-Fi was explicitly enabled but credentials are missing.
    if env::var_os("CARGO_FEATURE_WIFI").is_some() {
        if wifi_ssid.is_empty() {
            println!(
                "cargo:warning=wifi feature enabled but WIFI_SSID is not set; using empty string"
            );
        }
        if mqtt_pass.is_empty() {
            println!(
                "cargo:warning=wifi feature enabled but MQTT_PASS is not set; using empty string"
            );
        }
    }

    // 4) Expose as compile-time constants
    println!("cargo:rustc-env=WIFI_SSID={wifi_ssid}");
    println!("cargo:rustc-env=WIFI_PASS={wifi_pass}");
    println!("cargo:rustc-env=MQTT_CLIENT_ID={mqtt_client_id}");
    println!("cargo:rustc-env=MQTT_USER={mqtt_user}");
    println!("cargo:rustc-env=MQTT_PASS={mqtt_pass}");
    println!("cargo:rustc-env=THINGSPEAK_CHANNEL_ID={channel_id}");

    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASS");
    println!("cargo:rerun-if-env-changed=MQTT_CLIENT_ID");
    println!("cargo:rerun-if-env-changed=MQTT_USER");
    println!("cargo:rerun-if-env-changed=MQTT_PASS");
    println!("cargo:rerun-if-env-changed=THINGSPEAK_CHANNEL_ID");
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-changed=build.rs");
}

fn load_home_env(file: &str) {
    let home = match env::var_os("USERPROFILE").or_else(|| env::var_os("HOME")) {
        Some(path) => PathBuf::from(path),
        None => return,
    };
    let path = home.join(file);
    let _ = dotenvy::from_path(&path);
}

fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
