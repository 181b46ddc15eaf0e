//! pricewatch-core
//!
//! Core building blocks for the pricewatch poller.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ProductCode, Price, PriceRecord, Snapshot, ChangeReport, detect）
//! - **ports**: 抽象化レイヤー（PriceSource, SnapshotStore, NotificationChannel, SpreadsheetExporter, Clock）
//! - **app**: アプリケーションロジック（PriceWatch, Fetcher, Notifier, RetryPolicy, builder）
//! - **impls**: 実装（Tokovoucher / JSON ファイル / Telegram / xlsx、テスト用 InMemory）
//! - **config**: figment による階層設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
