use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use redis::{
    Client, Cmd, Connection, ConnectionAddr, ConnectionInfo, Pipeline, RedisConnectionInfo,
    RedisResult,
};
use tracing::{debug, info, warn};

use crate::error::KvError;
use crate::pool::{ConnectOptions, Transport};
use crate::scripts::{UNLINK_ORDERED, UNLINK_PREFIXED};
use crate::traits::KvStore;
use crate::transaction::{Guard, Transaction, Write};

/// Redis connections over TCP or a Unix socket.
///
/// Connections are opened on demand and up to `max_idle` of them are kept
/// for reuse. A connection that reported an error is dropped rather than
/// returned, so a broken socket never poisons later calls.
pub struct RedisPool {
    client: Client,
    transport: Transport,
    options: ConnectOptions,
    idle: Mutex<Vec<Connection>>,
    closed: AtomicBool,
}

impl RedisPool {
    /// Prepares a pool; no connection is made until first use.
    pub fn open(transport: &Transport, options: &ConnectOptions) -> Result<Self, KvError> {
        let addr = match transport {
            Transport::Tcp { host, port } => ConnectionAddr::Tcp(host.clone(), *port),
            #[cfg(unix)]
            Transport::Unix(path) => ConnectionAddr::Unix(path.clone()),
            other => {
                return Err(KvError::Transport(format!(
                    "{other} is not a redis transport"
                )))
            }
        };
        let info = ConnectionInfo {
            addr,
            redis: RedisConnectionInfo {
                db: options.db,
                username: options.username.clone(),
                password: options.password.clone(),
                ..Default::default()
            },
        };
        Ok(Self {
            client: Client::open(info)?,
            transport: transport.clone(),
            options: options.clone(),
            idle: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        })
    }

    fn checkout(&self) -> Result<Connection, KvError> {
        if self.is_closed() {
            return Err(KvError::Closed);
        }
        if let Some(conn) = self.idle.lock().pop() {
            return Ok(conn);
        }

        let conn = if self.options.connect_timeout.is_zero() {
            self.client.get_connection()?
        } else {
            self.client
                .get_connection_with_timeout(self.options.connect_timeout)?
        };
        if !self.options.socket_timeout.is_zero() {
            conn.set_read_timeout(Some(self.options.socket_timeout))?;
            conn.set_write_timeout(Some(self.options.socket_timeout))?;
        }
        debug!(transport = %self.transport, "redis connection opened");
        Ok(conn)
    }

    fn checkin(&self, conn: Connection) {
        if self.is_closed() {
            return;
        }
        let mut idle = self.idle.lock();
        if idle.len() < self.options.max_idle {
            idle.push(conn);
        }
    }

    fn with_connection<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> RedisResult<T>,
    ) -> Result<T, KvError> {
        let mut conn = self.checkout()?;
        match f(&mut conn) {
            Ok(value) => {
                self.checkin(conn);
                Ok(value)
            }
            Err(err) => {
                warn!(transport = %self.transport, error = %err, "dropping redis connection");
                Err(err.into())
            }
        }
    }
}

/// Command reading the value a guard is judged against.
fn guard_read(guard: &Guard) -> Cmd {
    match guard {
        Guard::Unchanged { key, .. } => {
            let mut cmd = redis::cmd("GET");
            cmd.arg(key);
            cmd
        }
        Guard::FieldFree { key, field, .. } => {
            let mut cmd = redis::cmd("HGET");
            cmd.arg(key).arg(field);
            cmd
        }
    }
}

/// `ZRANGE` over the first `limit` members, or `None` when nothing can match.
fn zrange_cmd(key: &str, limit: Option<usize>) -> Option<Cmd> {
    let stop = match limit {
        Some(0) => return None,
        Some(n) => i64::try_from(n).map_or(-1, |n| n - 1),
        None => -1,
    };
    let mut cmd = redis::cmd("ZRANGE");
    cmd.arg(key).arg(0).arg(stop);
    Some(cmd)
}

/// `ZRANGEBYSCORE` over `[min, max]`, or `None` when nothing can match.
fn zrange_by_score_cmd(key: &str, min: i64, max: i64, limit: Option<usize>) -> Option<Cmd> {
    if limit == Some(0) {
        return None;
    }
    let mut cmd = redis::cmd("ZRANGEBYSCORE");
    cmd.arg(key).arg(min).arg(max);
    if let Some(n) = limit {
        cmd.arg("LIMIT").arg(0).arg(i64::try_from(n).unwrap_or(i64::MAX));
    }
    Some(cmd)
}

fn queue(pipe: &mut Pipeline, writes: &[Write]) {
    for write in writes {
        match write {
            Write::Set { key, value } => pipe.cmd("SET").arg(key).arg(value.as_slice()).ignore(),
            Write::Del { key } => pipe.cmd("DEL").arg(key).ignore(),
            Write::ZAdd { key, score, member } => {
                pipe.cmd("ZADD").arg(key).arg(*score).arg(member).ignore()
            }
            Write::ZRem { key, member } => pipe.cmd("ZREM").arg(key).arg(member).ignore(),
            Write::HSet { key, field, value } => {
                pipe.cmd("HSET").arg(key).arg(field).arg(value).ignore()
            }
            Write::HDel { key, field } => pipe.cmd("HDEL").arg(key).arg(field).ignore(),
            Write::Scrub { ordering, prefix } => {
                pipe.cmd("EVAL")
                    .arg(UNLINK_ORDERED)
                    .arg(1)
                    .arg(ordering)
                    .arg(prefix)
                    .ignore();
                pipe.cmd("EVAL")
                    .arg(UNLINK_PREFIXED)
                    .arg(0)
                    .arg(prefix)
                    .ignore()
            }
        };
    }
}

impl KvStore for RedisPool {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KvError> {
        self.with_connection(|conn| redis::cmd("GET").arg(key).query(conn))
    }

    fn mget(&self, keys: &[String]) -> Result<Vec<Option<Vec<u8>>>, KvError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        self.with_connection(|conn| redis::cmd("MGET").arg(keys).query(conn))
    }

    fn zrange(&self, key: &str, limit: Option<usize>) -> Result<Vec<String>, KvError> {
        match zrange_cmd(key, limit) {
            Some(cmd) => self.with_connection(|conn| cmd.query(conn)),
            None => Ok(Vec::new()),
        }
    }

    fn zrange_by_score(
        &self,
        key: &str,
        min: i64,
        max: i64,
        limit: Option<usize>,
    ) -> Result<Vec<String>, KvError> {
        match zrange_by_score_cmd(key, min, max, limit) {
            Some(cmd) => self.with_connection(|conn| cmd.query(conn)),
            None => Ok(Vec::new()),
        }
    }

    fn zcard(&self, key: &str) -> Result<usize, KvError> {
        self.with_connection(|conn| redis::cmd("ZCARD").arg(key).query(conn))
    }

    fn hget(&self, key: &str, field: &str) -> Result<Option<String>, KvError> {
        self.with_connection(|conn| redis::cmd("HGET").arg(key).arg(field).query(conn))
    }

    fn ping(&self) -> Result<(), KvError> {
        self.with_connection(|conn| redis::cmd("PING").query::<String>(conn))
            .map(drop)
    }

    fn exec(&self, tx: &Transaction) -> Result<(), KvError> {
        let outcome = self.with_connection(|conn| {
            if tx.guards.is_empty() {
                let mut pipe = redis::pipe();
                pipe.atomic();
                queue(&mut pipe, &tx.writes);
                pipe.query::<()>(conn)?;
                return Ok(Ok(()));
            }

            let watched = tx.watched_keys();
            redis::transaction(conn, watched.as_slice(), |conn, pipe| {
                for guard in &tx.guards {
                    let current: Option<Vec<u8>> = guard_read(guard).query(conn)?;
                    if let Err(rejection) = guard.check(current.as_deref()) {
                        return Ok(Some(Err(rejection)));
                    }
                }
                queue(pipe, &tx.writes);
                Ok(pipe.query::<Option<()>>(conn)?.map(Ok))
            })
        })?;
        outcome.map_err(KvError::Rejected)
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.idle.lock().clear();
            info!(transport = %self.transport, "redis pool closed");
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Splits a packed command stream back into its arguments.
    fn unpack(packed: &[u8]) -> Vec<Vec<String>> {
        let text = String::from_utf8_lossy(packed).into_owned();
        let mut lines = text.split("\r\n");
        let mut commands = Vec::new();
        while let Some(header) = lines.next() {
            let Some(count) = header.strip_prefix('*') else {
                continue;
            };
            let count: usize = count.parse().unwrap();
            let mut args = Vec::with_capacity(count);
            for _ in 0..count {
                lines.next();
                args.push(lines.next().unwrap().to_string());
            }
            commands.push(args);
        }
        commands
    }

    fn args(cmd: &Cmd) -> Vec<String> {
        unpack(&cmd.get_packed_command()).remove(0)
    }

    fn queued(writes: &[Write]) -> Vec<Vec<String>> {
        let mut pipe = redis::pipe();
        queue(&mut pipe, writes);
        unpack(&pipe.get_packed_pipeline())
    }

    #[test]
    fn test_each_write_maps_to_its_command() {
        let commands = queued(&[
            Write::Set {
                key: "device:1".into(),
                value: b"doc".to_vec(),
            },
            Write::Del {
                key: "device:1".into(),
            },
            Write::ZAdd {
                key: "device".into(),
                score: 17,
                member: "1".into(),
            },
            Write::ZRem {
                key: "device".into(),
                member: "1".into(),
            },
            Write::HSet {
                key: "device:name".into(),
                field: "pump".into(),
                value: "1".into(),
            },
            Write::HDel {
                key: "device:name".into(),
                field: "pump".into(),
            },
        ]);

        assert_eq!(
            commands,
            vec![
                vec!["SET", "device:1", "doc"],
                vec!["DEL", "device:1"],
                vec!["ZADD", "device", "17", "1"],
                vec!["ZREM", "device", "1"],
                vec!["HSET", "device:name", "pump", "1"],
                vec!["HDEL", "device:name", "pump"],
            ]
        );
    }

    #[test]
    fn test_scrub_runs_both_scripts() {
        let commands = queued(&[Write::Scrub {
            ordering: "reading".into(),
            prefix: "reading:".into(),
        }]);

        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[0],
            vec!["EVAL", UNLINK_ORDERED, "1", "reading", "reading:"]
        );
        assert_eq!(commands[1], vec!["EVAL", UNLINK_PREFIXED, "0", "reading:"]);
    }

    #[test]
    fn test_guards_read_what_they_check() {
        let unchanged = Guard::Unchanged {
            key: "device:1".into(),
            value: b"doc".to_vec(),
        };
        let free = Guard::FieldFree {
            key: "device:name".into(),
            field: "pump".into(),
            owner: None,
        };
        assert_eq!(args(&guard_read(&unchanged)), vec!["GET", "device:1"]);
        assert_eq!(args(&guard_read(&free)), vec!["HGET", "device:name", "pump"]);
    }

    #[test]
    fn test_zrange_limits() {
        assert!(zrange_cmd("event", Some(0)).is_none());
        assert_eq!(
            args(&zrange_cmd("event", None).unwrap()),
            vec!["ZRANGE", "event", "0", "-1"]
        );
        assert_eq!(
            args(&zrange_cmd("event", Some(10)).unwrap()),
            vec!["ZRANGE", "event", "0", "9"]
        );
        assert_eq!(
            args(&zrange_cmd("event", Some(usize::MAX)).unwrap()),
            vec!["ZRANGE", "event", "0", "-1"]
        );
    }

    #[test]
    fn test_zrange_by_score_limits() {
        let max = i64::MAX.to_string();
        assert!(zrange_by_score_cmd("event", 0, 10, Some(0)).is_none());
        assert_eq!(
            args(&zrange_by_score_cmd("event", 0, 10, None).unwrap()),
            vec!["ZRANGEBYSCORE", "event", "0", "10"]
        );
        assert_eq!(
            args(&zrange_by_score_cmd("event", 0, 10, Some(usize::MAX)).unwrap()),
            vec!["ZRANGEBYSCORE", "event", "0", "10", "LIMIT", "0", max.as_str()]
        );
    }
}
