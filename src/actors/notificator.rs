use actix::prelude::*;

use crate::{
    config::Config,
    debug,
    events::{EventSink, OrchestratorEvent},
    info,
    utilities::notify_webhook,
    warn,
};


/// Notificator actor delivers orchestrator events to the presentation layer.
/// Delivery is best-effort: events land in the log stream and, when a webhook
/// is configured, the notable ones are pushed there too. Never blocks the
/// orchestration logic:
#[derive(Debug, Copy, Clone)]
pub struct Notificator;


/// Single orchestrator event to deliver
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct Notify(pub OrchestratorEvent);


impl Handler<Notify> for Notificator {
    type Result = ();

    fn handle(&mut self, msg: Notify, _ctx: &mut Self::Context) -> Self::Result {
        let event = msg.0;
        info!("Event: {}", event.to_string());

        let config = Config::load();
        let webhook = match config.events_webhook {
            Some(ref webhook) => webhook.clone(),
            None => {
                debug!("No events webhook configured");
                return;
            }
        };
        let channel = config.events_channel.unwrap_or_else(|| "#certs".to_string());

        match event {
            OrchestratorEvent::DomainFailed { domain, error } => {
                warn!("Notifying webhook about failed domain: {domain}");
                notify_webhook(
                    &webhook,
                    &channel,
                    &format!("Renewal failed for domain: {domain}. {error}"),
                    ":fire:",
                );
            }
            OrchestratorEvent::CheckCompleted { report } if report.renewed > 0 => {
                notify_webhook(
                    &webhook,
                    &channel,
                    &format!("Renewed {} certificate(s)", report.renewed),
                    ":lock:",
                );
            }
            _ => {
                debug!("Event below webhook notification threshold");
            }
        }
    }
}


impl Actor for Notificator {
    type Context = SyncContext<Self>;
}


/// Fire-and-forget delivery through the actor mailbox:
impl EventSink for Addr<Notificator> {
    fn emit(&self, event: OrchestratorEvent) {
        self.do_send(Notify(event));
    }
}
