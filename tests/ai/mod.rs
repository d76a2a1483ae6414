mod agents;
mod qlearn;
mod search;
