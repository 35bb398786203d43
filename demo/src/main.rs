use async_trait::async_trait;
use easyevent_core::Event;
use easyevent_core::dispatcher::{EventHandler, InMemoryEventBus};
use easyevent_core::executor::{ExecutorConfig, TraceExecutor};
use easyevent_core::interceptor::{InterceptorContext, LoggingInterceptor, PublisherInterceptor};
use easyevent_core::publisher::{DefaultEventPublisher, EventPublisher, PublisherConfig};
use easyevent_core::transfer::LocalEventSender;
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
enum AccountEvent {
    Opened { account: String, initial_balance: i64 },
    Deposited { account: String, amount: i64 },
    Withdrawn { account: String, amount: i64 },
}

/// 维护余额的处理器；余额不足的取款视为处理失败
#[derive(Default)]
struct BalanceProjector {
    balance: AtomicI64,
}

#[async_trait]
impl EventHandler<AccountEvent> for BalanceProjector {
    fn handler_name(&self) -> &str {
        "balance-projector"
    }

    async fn handle(&self, event: &AccountEvent) -> anyhow::Result<()> {
        match event {
            AccountEvent::Opened {
                initial_balance, ..
            } => {
                self.balance.store(*initial_balance, Ordering::SeqCst);
            }
            AccountEvent::Deposited { amount, .. } => {
                self.balance.fetch_add(*amount, Ordering::SeqCst);
            }
            AccountEvent::Withdrawn { amount, .. } => {
                if self.balance.load(Ordering::SeqCst) < *amount {
                    anyhow::bail!("insufficient funds");
                }
                self.balance.fetch_sub(*amount, Ordering::SeqCst);
            }
        }
        Ok(())
    }
}

/// 冻结账户：否决该账户的所有事件
struct FrozenAccounts {
    frozen: Vec<String>,
}

impl PublisherInterceptor for FrozenAccounts {
    fn name(&self) -> &str {
        "frozen-accounts"
    }

    fn pre_publish(&self, event: &Event, _ctx: &mut InterceptorContext) -> bool {
        let Some(event) = event.downcast_ref::<AccountEvent>() else {
            return true;
        };
        let account = match event {
            AccountEvent::Opened { account, .. }
            | AccountEvent::Deposited { account, .. }
            | AccountEvent::Withdrawn { account, .. } => account,
        };
        !self.frozen.contains(account)
    }
}

/// 通过环境变量 `EASYEVENT_CONFIG`（JSON）覆盖默认配置
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    publisher: PublisherConfig,
    executor: ExecutorConfig,
}

fn load_config() -> anyhow::Result<DemoConfig> {
    match std::env::var("EASYEVENT_CONFIG") {
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(_) => Ok(DemoConfig::default()),
    }
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .init();

    let config = load_config()?;
    tracing::info!(?config, "starting easyevent demo");

    let projector = Arc::new(BalanceProjector::default());
    let bus = Arc::new(InMemoryEventBus::new());
    bus.register::<AccountEvent, _>(projector.clone());

    let executor = Arc::new(TraceExecutor::new(config.executor)?);
    let sender = Arc::new(LocalEventSender::new(bus.clone(), executor.clone()));

    let publisher = DefaultEventPublisher::builder()
        .event_bus(bus)
        .event_sender(sender)
        .executor(executor)
        .interceptors(vec![
            Arc::new(LoggingInterceptor),
            Arc::new(FrozenAccounts {
                frozen: vec!["acc-frozen".into()],
            }),
        ])
        .config(config.publisher)
        .build();

    // 开户（同步）
    let opened = publisher
        .sync_publish(Event::new(AccountEvent::Opened {
            account: "acc-1".into(),
            initial_balance: 1000,
        }))
        .await;
    println!("opened: {opened}");

    // 透支（同步，处理器失败 => false）
    let overdraft = publisher
        .sync_publish(Event::new(AccountEvent::Withdrawn {
            account: "acc-1".into(),
            amount: 5000,
        }))
        .await;
    println!("overdraft accepted: {overdraft}");

    // 冻结账户（被否决 => true，但不会投递）
    let frozen = publisher
        .sync_publish(Event::new(AccountEvent::Deposited {
            account: "acc-frozen".into(),
            amount: 1,
        }))
        .await;
    println!("frozen deposit: {frozen}");

    // 存款（异步）与批量取款
    publisher
        .async_publish(Event::new(AccountEvent::Deposited {
            account: "acc-1".into(),
            amount: 500,
        }))
        .await?;
    publisher
        .async_publish_list(vec![
            Event::new(AccountEvent::Withdrawn {
                account: "acc-1".into(),
                amount: 200,
            }),
            Event::new(AccountEvent::Withdrawn {
                account: "acc-frozen".into(),
                amount: 200,
            }),
        ])
        .await?;

    // 等待本地发送器的后台投递完成
    tokio::time::sleep(Duration::from_millis(100)).await;
    publisher.executor().shutdown().await;

    println!("balance: {}", projector.balance.load(Ordering::SeqCst));
    Ok(())
}
