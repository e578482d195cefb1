//! Integration tests for the sweep engine, driven through the prober
//! seam with scripted in-memory hosts. No test here touches the network.

#[cfg(test)]
mod support;
#[cfg(test)]
mod sweep;
