use glob::glob;
use slack_hooked::{PayloadBuilder, Slack};
use std::{
    fs::{File, OpenOptions},
    io::{Read, Write},
};

use crate::{debug, error};


/// Read whole text file into a String:
pub fn read_text_file(path: &str) -> Result<String, std::io::Error> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents)
}


/// Append a line to a file, creating it when absent:
pub fn write_append(file_path: &str, contents: &str) -> Result<(), std::io::Error> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file_path)?;
    writeln!(file, "{contents}")?;
    Ok(())
}


/// Produce list of absolute paths matching given glob pattern:
pub fn produce_list_absolute(glob_pattern: &str) -> Vec<String> {
    let mut list = vec![];
    match glob(glob_pattern) {
        Ok(entries) => {
            for entry in entries {
                match entry {
                    Ok(path) => {
                        if let Some(element) = path.to_str() {
                            list.push(element.to_string())
                        }
                    }
                    Err(err) => {
                        error!("Error: produce_list_absolute(): {}", err);
                    }
                }
            }
        }
        Err(err) => {
            error!("Bad glob pattern: {}. Error: {}", glob_pattern, err);
        }
    }
    debug!("produce_list_absolute(): Elements: {:?}", list);
    list
}


/// Send a webhook notification. Delivery is best-effort and failures are only logged:
pub fn notify_webhook(webhook: &str, channel: &str, message: &str, icon: &str) {
    Slack::new(webhook)
        .and_then(|slack| {
            PayloadBuilder::new()
                .text(message)
                .channel(channel)
                .username("Certmole")
                .icon_emoji(icon)
                .build()
                .and_then(|payload| slack.send(&payload))
        })
        .map(|_| debug!("Webhook notification sent: {}", message))
        .unwrap_or_else(|err| {
            error!("Webhook notification failed: {}", err);
        });
}
