use actix::prelude::*;

use crate::{
    actors::notificator::Notificator,
    cycle::Executor,
    probes::cache::STATUS_CACHE,
    scheduler::{self, TickOutcome},
    store::Store,
    tool::certtool::CertTool,
};


/// RenewalExecutor actor runs one scheduler tick per message on its own
/// synchronous arbiter thread, so blocking waits inside a cycle never stall
/// the rest of the system:
#[derive(Debug, Copy, Clone)]
pub struct RenewalExecutor;


/// Request one scheduler tick, with the notificator to stream events to
#[derive(Message, Debug, Clone)]
#[rtype(result = "TickOutcome")]
pub struct TickNow(pub Addr<Notificator>);


impl Handler<TickNow> for RenewalExecutor {
    type Result = MessageResult<TickNow>;

    fn handle(&mut self, msg: TickNow, _ctx: &mut Self::Context) -> Self::Result {
        let store = Store::from_config();
        let driver = CertTool::from_config();
        let executor = Executor::default();
        MessageResult(scheduler::tick(
            &store,
            &STATUS_CACHE,
            &driver,
            &executor,
            &msg.0,
        ))
    }
}


impl Actor for RenewalExecutor {
    type Context = SyncContext<Self>;
}
