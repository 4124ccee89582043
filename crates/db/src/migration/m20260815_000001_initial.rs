//! Initial database migration.
//!
//! Creates the balance ledger schema: users, balance accounts, the
//! append-only ledger, deposits, withdrawal requests, peer transfers,
//! and the investment tables, plus the seed investment plans.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS & BALANCES
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(BALANCE_ACCOUNTS_SQL).await?;
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;

        // ============================================================
        // PART 3: MONEY MOVEMENT
        // ============================================================
        db.execute_unprepared(DEPOSITS_SQL).await?;
        db.execute_unprepared(WITHDRAWAL_REQUESTS_SQL).await?;
        db.execute_unprepared(P2P_TRANSFERS_SQL).await?;

        // ============================================================
        // PART 4: INVESTMENTS
        // ============================================================
        db.execute_unprepared(INVESTMENT_PLANS_SQL).await?;
        db.execute_unprepared(USER_INVESTMENTS_SQL).await?;

        // ============================================================
        // PART 5: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        // ============================================================
        // PART 6: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_INVESTMENT_PLANS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Ledger entry direction
CREATE TYPE entry_direction AS ENUM ('credit', 'debit');

-- Deposit lifecycle
CREATE TYPE deposit_status AS ENUM ('pending', 'confirmed', 'rejected');

-- Withdrawal lifecycle
CREATE TYPE withdrawal_status AS ENUM (
    'pending',
    'approved',
    'processing',
    'sent',
    'failed',
    'rejected'
);

-- Supported blockchain networks
CREATE TYPE chain AS ENUM (
    'ethereum',
    'bsc',
    'tron',
    'bitcoin',
    'solana',
    'polygon'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    display_name VARCHAR(255) NOT NULL,
    referred_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_no_self_referral CHECK (referred_by IS NULL OR referred_by <> id)
);

CREATE INDEX idx_users_referred_by ON users(referred_by) WHERE referred_by IS NOT NULL;
";

const BALANCE_ACCOUNTS_SQL: &str = r"
CREATE TABLE balance_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    balance NUMERIC(28, 8) NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_balance_non_negative CHECK (balance >= 0)
);
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    account_id UUID NOT NULL REFERENCES balance_accounts(id),
    direction entry_direction NOT NULL,
    amount NUMERIC(28, 8) NOT NULL,
    reason VARCHAR(100) NOT NULL,
    reference_id UUID,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_entry_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_le_account ON ledger_entries(account_id);
CREATE INDEX idx_le_account_created ON ledger_entries(account_id, created_at);
CREATE INDEX idx_le_reference ON ledger_entries(reference_id) WHERE reference_id IS NOT NULL;
";

const DEPOSITS_SQL: &str = r"
CREATE TABLE deposits (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    amount NUMERIC(28, 8) NOT NULL,
    chain chain NOT NULL,
    tx_identifier VARCHAR(255) NOT NULL UNIQUE,
    status deposit_status NOT NULL DEFAULT 'pending',
    confirmations INTEGER NOT NULL DEFAULT 0,
    credited BOOLEAN NOT NULL DEFAULT false,
    admin_note TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_deposit_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_credited_implies_confirmed CHECK (NOT credited OR status = 'confirmed')
);

CREATE INDEX idx_deposits_owner ON deposits(owner_id);
CREATE INDEX idx_deposits_status ON deposits(status) WHERE status = 'pending';
";

const WITHDRAWAL_REQUESTS_SQL: &str = r"
CREATE TABLE withdrawal_requests (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    amount NUMERIC(28, 8) NOT NULL,
    chain chain NOT NULL,
    destination_address VARCHAR(255) NOT NULL,
    status withdrawal_status NOT NULL DEFAULT 'pending',
    admin_note TEXT,
    payout_tx_identifier VARCHAR(255),
    processed_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_withdrawal_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_wr_owner ON withdrawal_requests(owner_id);
CREATE INDEX idx_wr_status ON withdrawal_requests(status) WHERE status IN ('pending', 'approved');
";

const P2P_TRANSFERS_SQL: &str = r"
CREATE TABLE p2p_transfers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    sender_id UUID NOT NULL REFERENCES users(id),
    recipient_id UUID NOT NULL REFERENCES users(id),
    amount NUMERIC(28, 8) NOT NULL,
    note VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_transfer_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_no_self_transfer CHECK (sender_id <> recipient_id)
);

CREATE INDEX idx_p2p_sender ON p2p_transfers(sender_id);
CREATE INDEX idx_p2p_recipient ON p2p_transfers(recipient_id);
";

const INVESTMENT_PLANS_SQL: &str = r"
CREATE TABLE investment_plans (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL UNIQUE,
    profit_percent NUMERIC(7, 2) NOT NULL,
    duration_hours INTEGER NOT NULL,
    min_amount NUMERIC(28, 8) NOT NULL,
    max_amount NUMERIC(28, 8),
    referral_bonus_percent NUMERIC(7, 2),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_plan_profit_positive CHECK (profit_percent > 0),
    CONSTRAINT chk_plan_duration_positive CHECK (duration_hours > 0),
    CONSTRAINT chk_plan_bounds CHECK (max_amount IS NULL OR max_amount >= min_amount)
);
";

const USER_INVESTMENTS_SQL: &str = r"
CREATE TABLE user_investments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    plan_id UUID NOT NULL REFERENCES investment_plans(id),
    amount NUMERIC(28, 8) NOT NULL,
    expected_profit NUMERIC(28, 8) NOT NULL,
    started_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    matures_at TIMESTAMPTZ NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_investment_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_ui_owner ON user_investments(owner_id);
CREATE INDEX idx_ui_plan ON user_investments(plan_id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: set_updated_at
-- Keeps updated_at current on every row update
-- ============================================================
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
BEFORE UPDATE ON users
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_balance_accounts_updated_at
BEFORE UPDATE ON balance_accounts
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_deposits_updated_at
BEFORE UPDATE ON deposits
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_withdrawal_requests_updated_at
BEFORE UPDATE ON withdrawal_requests
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_investment_plans_updated_at
BEFORE UPDATE ON investment_plans
FOR EACH ROW EXECUTE FUNCTION set_updated_at();

-- ============================================================
-- FUNCTION: forbid_ledger_mutation
-- The ledger is append-only: no updates, no deletes
-- ============================================================
CREATE OR REPLACE FUNCTION forbid_ledger_mutation()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'ledger_entries is append-only';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_ledger_append_only
BEFORE UPDATE OR DELETE ON ledger_entries
FOR EACH ROW EXECUTE FUNCTION forbid_ledger_mutation();
";

const SEED_INVESTMENT_PLANS_SQL: &str = r"
-- ============================================================
-- SEED: Investment plans
-- ============================================================
INSERT INTO investment_plans
    (name, profit_percent, duration_hours, min_amount, max_amount, referral_bonus_percent)
VALUES
    ('Basic',    13.00, 24, 100,   999,   NULL),
    ('Standard', 25.00, 36, 1000,  4999,  NULL),
    ('Expert',   50.00, 48, 5000,  10999, NULL),
    ('VIP',      100.00, 72, 11000, NULL,  8.00)
ON CONFLICT (name) DO NOTHING;
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================

-- Drop triggers
DROP TRIGGER IF EXISTS trg_ledger_append_only ON ledger_entries;
DROP TRIGGER IF EXISTS trg_investment_plans_updated_at ON investment_plans;
DROP TRIGGER IF EXISTS trg_withdrawal_requests_updated_at ON withdrawal_requests;
DROP TRIGGER IF EXISTS trg_deposits_updated_at ON deposits;
DROP TRIGGER IF EXISTS trg_balance_accounts_updated_at ON balance_accounts;
DROP TRIGGER IF EXISTS trg_users_updated_at ON users;

-- Drop functions
DROP FUNCTION IF EXISTS forbid_ledger_mutation();
DROP FUNCTION IF EXISTS set_updated_at();

-- Drop tables (reverse order of creation)
DROP TABLE IF EXISTS user_investments CASCADE;
DROP TABLE IF EXISTS investment_plans CASCADE;
DROP TABLE IF EXISTS p2p_transfers CASCADE;
DROP TABLE IF EXISTS withdrawal_requests CASCADE;
DROP TABLE IF EXISTS deposits CASCADE;
DROP TABLE IF EXISTS ledger_entries CASCADE;
DROP TABLE IF EXISTS balance_accounts CASCADE;
DROP TABLE IF EXISTS users CASCADE;

-- Drop enums
DROP TYPE IF EXISTS chain;
DROP TYPE IF EXISTS withdrawal_status;
DROP TYPE IF EXISTS deposit_status;
DROP TYPE IF EXISTS entry_direction;
";
