/*!

This is the long-form manual for `vote_aggregates` and `votedash`.

## Input format

The input is a table with one row per motion. The first row is the header.

Three columns are required and found by name, wherever they are in the header:
* `proposer` the party that introduced the motion
* `topic` the subject area of the motion
* `decision` `1` if the motion was adopted, `0` if it was rejected

The `proposer` and `topic` cells cannot be blank.

The parties are found by position: by default, the 6th to the 20th columns of the
header (`--first-party-column 6 --last-party-column 20`). The name of the column is
the name of the party. Each cell holds the vote of that party on the motion:
`1` for support, `0` against. `1.0` and `0.0` are accepted too. Any other value
stops the loading with an error that points to the line and the column.

Other columns (identifiers, dates, titles) are ignored.

The following sources are supported:
* `csv` a local comma separated file (default)
* `xlsx` a local Excel file. The first worksheet is used unless `--excel-worksheet-name` is given.
* any `http://` or `https://` URL, which is expected to serve a CSV file

## Aggregates

* **Topic distribution** for each topic, the number of motions, adopted and rejected.
* **Party vote breakdown** for each topic and party, the number of motions the party
  supported and opposed. All the parties are listed under every topic, even with zero counts.
* **Proposal matrix** for each proposer and topic, the number of motions introduced.
  Missing combinations are 0.
* **Party correlation** the Pearson correlation between the votes of each pair of parties.
  When a party voted the same way on every motion, its correlation is not defined and
  it is reported as 1.

Topics are always sorted alphabetically. An empty table gives empty aggregates.

## Selecting a topic

The party breakdown is shown for one topic (`--topic`). If the topic is not in the data,
`votedash` shows an empty chart, or the first topic with `--fallback first_topic`.

## Configuration file

```json
{
  "outputSettings": {
    "title": "Roll-call votes 2019-2023",
    "outputPath": "dashboard.json",
    "defaultTopic": "Health",
    "fallback": "placeholder"
  },
  "source": {
    "provider": "csv",
    "filePath": "votings.csv",
    "firstPartyColumnIndex": 6,
    "lastPartyColumnIndex": 20
  }
}
```

The file path is relative to the directory of the configuration file. The column indexes
start at 1 and may also be written as a single Excel column letter (`"F"`).

*/
