use std::rc::Rc;

use dioxus::prelude::*;
use futures_channel::mpsc::UnboundedSender;
use futures_util::StreamExt;

use crate::core::context::AppContext;
use crate::core::format;
use crate::core::storage::{LocalVoteMemory, VoteMemory};

use super::controller::{CastOutcome, VoteController, BURN_REPEAT_MESSAGE, LOCKED_PROMPT};
use super::store::CounterStore;
use super::tally::{VoteKind, VoteTally};

#[derive(Debug, Clone)]
enum VoteEvent {
    Cast(VoteKind),
    Snapshot(VoteTally),
}

/// The public vote tally: two buttons, a live meter, and the burn lock.
///
/// All counter mutation goes through the controller's transactional path;
/// pushed snapshots are authoritative and fully replace the local totals.
#[component]
pub fn VotePanel() -> Element {
    let ctx = use_context::<AppContext>();
    let mut mood = use_context::<Signal<Option<VoteKind>>>();

    let initial = use_hook(|| LocalVoteMemory.load());
    let counts = use_signal(VoteTally::default);
    let saving = use_signal(|| false);
    let vote_error = use_signal(|| Option::<String>::None);
    let locked = use_signal(|| initial.has_voted_burn);
    let mut show_lock_modal = use_signal(|| false);

    let coroutine = {
        let store = ctx.counters.clone();
        let mut counts_signal = counts;
        let mut saving_signal = saving;
        let mut error_signal = vote_error;
        let mut locked_signal = locked;

        use_coroutine(move |mut rx: UnboundedReceiver<VoteEvent>| {
            let store = store.clone();
            async move {
                let mut controller = VoteController::new(store, LocalVoteMemory);

                while let Some(event) = rx.next().await {
                    match event {
                        VoteEvent::Snapshot(tally) => {
                            counts_signal.set(tally);
                        }
                        VoteEvent::Cast(kind) => {
                            saving_signal.set(true);
                            error_signal.set(None);

                            match controller.cast(kind).await {
                                Ok(CastOutcome::Committed { kind, .. }) => {
                                    mood.set(Some(kind));
                                    if kind == VoteKind::Burn {
                                        locked_signal.set(true);
                                    }
                                }
                                Ok(CastOutcome::BurnRepeatRejected) => {
                                    error_signal.set(Some(BURN_REPEAT_MESSAGE.to_string()));
                                }
                                Ok(CastOutcome::SupportBlockedByLock) => {
                                    show_lock_modal.set(true);
                                }
                                Err(err) => {
                                    error_signal.set(Some(err.to_string()));
                                }
                            }

                            saving_signal.set(false);
                        }
                    }
                }
            }
        })
    };

    // Live feed: held for the component's lifetime so the handler detaches
    // on unmount.
    let _subscription = use_hook(|| {
        let tx: UnboundedSender<VoteEvent> = coroutine.tx();
        Rc::new(ctx.counters.subscribe(Box::new(move |tally| {
            let _ = tx.unbounded_send(VoteEvent::Snapshot(tally));
        })))
    });

    let tally = counts();
    let support_pct = tally.support_pct();
    let burn_pct = tally.burn_pct();
    let is_saving = saving();
    let is_locked = locked();
    let error_message = vote_error();

    rsx! {
        section { class: "panel vote-panel",
            div { class: "panel__header",
                div {
                    h2 { "Voice your stance" }
                    p { class: "helper",
                        "Cast a vote to support or burn. Totals update live."
                    }
                }
                if is_saving {
                    span { class: "pill pill--muted", "Saving…" }
                }
                if let Some(message) = error_message {
                    span { class: "pill pill--error", "{message}" }
                }
            }

            div { class: "vote-actions",
                button {
                    r#type: "button",
                    class: "vote-btn vote-btn--support",
                    disabled: is_saving,
                    onclick: move |_| coroutine.send(VoteEvent::Cast(VoteKind::Support)),
                    "Support"
                }
                button {
                    r#type: "button",
                    class: "vote-btn vote-btn--burn",
                    disabled: is_saving || is_locked,
                    title: if is_locked { BURN_REPEAT_MESSAGE } else { "" },
                    onclick: move |_| coroutine.send(VoteEvent::Cast(VoteKind::Burn)),
                    "Be against and burn"
                }
            }

            div { class: "vote-meter", aria_label: "Vote distribution",
                div {
                    class: "vote-meter__support",
                    style: "width: {support_pct}%",
                    title: "Support {support_pct}%",
                }
                div {
                    class: "vote-meter__burn",
                    style: "width: {burn_pct}%",
                    title: "Burn {burn_pct}%",
                }
            }

            div { class: "vote-stats",
                span { class: "support",
                    "Support: {format::format_count(tally.support)} ({format::format_percent(support_pct)})"
                }
                span { class: "burn",
                    "Burn: {format::format_count(tally.burn)} ({format::format_percent(burn_pct)})"
                }
                span { class: "total",
                    "Total votes: {format::format_count(tally.total())}"
                }
            }
        }

        if show_lock_modal() {
            div { class: "modal-backdrop", role: "dialog", aria_modal: "true",
                div { class: "modal",
                    p { class: "modal__title", "{LOCKED_PROMPT}" }
                    button {
                        r#type: "button",
                        class: "modal__dismiss",
                        onclick: move |_| show_lock_modal.set(false),
                        "burn"
                    }
                }
            }
        }
    }
}
