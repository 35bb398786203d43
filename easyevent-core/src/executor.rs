//! 链路追踪执行器（TraceExecutor）
//!
//! 固定数量的工作任务 + 有界队列：
//! - 提交的任务自动挂载提交方当前的 `tracing::Span`，跨任务保持链路上下文；
//! - `execute` 在队列满时等待（阻塞式有界队列语义），`try_execute` 则立即失败；
//! - 任务 panic 会被捕获并记录，工作任务继续运行，池大小保持不变；
//! - `shutdown` 拒绝新任务，排队中的任务全部执行完毕后工作任务退出；
//! - `shutdown_now` 立即停止，执行中与尚未开始的任务都被丢弃。
//!
//! 由发布器在进程生命周期内持有，供发送器等协作方卸载传输 I/O。
//!
use crate::error::{EventError, EventResult};
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde::Deserialize;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, Span, error};

type Job = BoxFuture<'static, ()>;

/// 执行器配置
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// 工作任务数量（固定）
    pub workers: usize,
    /// 队列容量
    pub queue_capacity: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            queue_capacity: 1024,
        }
    }
}

impl ExecutorConfig {
    pub fn validate(&self) -> EventResult<()> {
        if self.workers == 0 {
            return Err(EventError::InvalidConfig {
                reason: "executor workers must be greater than 0".into(),
            });
        }
        if self.queue_capacity == 0 {
            return Err(EventError::InvalidConfig {
                reason: "executor queue_capacity must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

pub struct TraceExecutor {
    tx: mpsc::Sender<Job>,
    /// 优雅关闭：关闭队列入口，排空后退出
    closing: CancellationToken,
    /// 立即关闭：放弃排队中的任务
    abort: CancellationToken,
    config: ExecutorConfig,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl TraceExecutor {
    /// 创建执行器并启动工作任务，必须在 tokio 运行时内调用
    pub fn new(config: ExecutorConfig) -> EventResult<Self> {
        config.validate()?;

        let (tx, rx) = mpsc::channel::<Job>(config.queue_capacity);
        let rx = Arc::new(Mutex::new(rx));
        let closing = CancellationToken::new();
        let abort = CancellationToken::new();

        let workers = (0..config.workers)
            .map(|_| {
                tokio::spawn(Self::worker_loop(
                    rx.clone(),
                    closing.clone(),
                    abort.clone(),
                ))
            })
            .collect();

        Ok(Self {
            tx,
            closing,
            abort,
            config,
            workers: Mutex::new(workers),
        })
    }

    async fn worker_loop(
        rx: Arc<Mutex<mpsc::Receiver<Job>>>,
        closing: CancellationToken,
        abort: CancellationToken,
    ) {
        loop {
            let next = async {
                let mut rx = rx.lock().await;
                tokio::select! {
                    job = rx.recv() => job,
                    _ = closing.cancelled() => {
                        // 关闭入口后 recv 继续交付已排队的任务，排空后返回 None
                        rx.close();
                        rx.recv().await
                    }
                }
            };
            let job = tokio::select! {
                _ = abort.cancelled() => break,
                job = next => job,
            };
            let Some(job) = job else {
                break;
            };
            tokio::select! {
                _ = abort.cancelled() => break,
                res = AssertUnwindSafe(job).catch_unwind() => {
                    if res.is_err() {
                        error!("executor job panicked");
                    }
                }
            }
        }
    }

    /// 提交任务，队列满时等待空位
    pub async fn execute<F>(&self, fut: F) -> EventResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.closing.is_cancelled() {
            return Err(EventError::ExecutorShutdown);
        }
        let job = fut.instrument(Span::current()).boxed();
        self.tx
            .send(job)
            .await
            .map_err(|_| EventError::ExecutorShutdown)
    }

    /// 提交任务，队列满时立即返回 `ExecutorSaturated`
    pub fn try_execute<F>(&self, fut: F) -> EventResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.closing.is_cancelled() {
            return Err(EventError::ExecutorShutdown);
        }
        let job = fut.instrument(Span::current()).boxed();
        self.tx.try_send(job).map_err(|err| match err {
            mpsc::error::TrySendError::Full(_) => EventError::ExecutorSaturated {
                capacity: self.config.queue_capacity,
            },
            mpsc::error::TrySendError::Closed(_) => EventError::ExecutorShutdown,
        })
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn is_shutdown(&self) -> bool {
        self.closing.is_cancelled()
    }

    /// 拒绝新任务，等待已排队的任务执行完毕后工作任务退出
    pub async fn shutdown(&self) {
        self.closing.cancel();
        self.join().await;
    }

    /// 立即停止工作任务，执行中与尚未开始的任务都被丢弃
    pub async fn shutdown_now(&self) {
        self.closing.cancel();
        self.abort.cancel();
        self.join().await;
    }

    async fn join(&self) {
        let workers = std::mem::take(&mut *self.workers.lock().await);
        for w in workers {
            let _ = w.await;
        }
    }
}

impl Drop for TraceExecutor {
    fn drop(&mut self) {
        self.closing.cancel();
    }
}
